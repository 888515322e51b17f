table! {
    food (id) {
        id -> Integer,
        title -> Text,
        price -> Text,
        menu_type -> Text,
        user_fk -> Nullable<Integer>,
    }
}

table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password -> Text,
    }
}

joinable!(food -> users (user_fk));

allow_tables_to_appear_in_same_query!(food, users);
