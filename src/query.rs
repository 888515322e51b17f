use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::error::AppError;
use crate::models::{Food, NewFood, NewUser, User, UserDetail};
use crate::password::hash_password;
use crate::schema::{food, users};

pub(crate) fn create_food(conn: &SqliteConnection, new_food: &NewFood) -> Result<(), AppError> {
    conn.transaction::<_, AppError, _>(|| {
        //the FK constraint would catch this too, but only with a generic message
        if let Some(owner) = new_food.user_fk {
            if !user_exists(owner, conn)? {
                log::warn!("rejected food {:?}: no user with id {}", new_food.title, owner);
                return Err(AppError::UnknownOwner(owner));
            }
        }

        diesel::insert_into(food::table)
            .values(new_food)
            .execute(conn)
            .map_err(|e| match (e, new_food.user_fk) {
                (DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _), Some(owner)) => {
                    AppError::UnknownOwner(owner)
                }
                (e, _) => AppError::Database(e),
            })?;
        Ok(())
    })?;

    log::info!(
        "added food {:?} to menu {:?}",
        new_food.title,
        new_food.menu_type
    );
    Ok(())
}

pub(crate) fn find_all_foods(conn: &SqliteConnection) -> Result<Vec<Food>, AppError> {
    Ok(food::table.order(food::id).load::<Food>(conn)?)
}

pub(crate) fn find_foods_by_menu_type(
    conn: &SqliteConnection,
    kind: &str,
) -> Result<Vec<Food>, AppError> {
    Ok(food::table
        .filter(food::menu_type.eq(kind))
        .order(food::id)
        .load::<Food>(conn)?)
}

pub(crate) fn create_user(
    conn: &SqliteConnection,
    name: &str,
    plain_password: &str,
) -> Result<(), AppError> {
    if username_taken(name, conn)? {
        log::warn!("rejected user {:?}: name already taken", name);
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password(plain_password)?;
    let new_user = NewUser {
        username: name,
        password: &hash,
    };

    //a concurrent insert of the same name can still slip past the check above
    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::DuplicateUsername
            }
            e => AppError::Database(e),
        })?;

    log::info!("created user {:?}", name);
    Ok(())
}

pub(crate) fn find_user(
    conn: &SqliteConnection,
    user_id: i32,
) -> Result<Option<UserDetail>, AppError> {
    let user = match users::table.find(user_id).first::<User>(conn).optional()? {
        Some(user) => user,
        None => return Ok(None),
    };

    let meal = food::table
        .filter(food::user_fk.eq(user.id))
        .order(food::id)
        .load::<Food>(conn)?;

    Ok(Some(UserDetail::new(user, meal)))
}

/// Removes the user and, through the cascade on `food.user_fk`, their food.
/// Returns the number of users deleted.
#[allow(dead_code)]
pub(crate) fn delete_user(conn: &SqliteConnection, user_id: i32) -> Result<usize, AppError> {
    let deleted = diesel::delete(users::table.find(user_id)).execute(conn)?;
    if deleted > 0 {
        log::info!("deleted user {}", user_id);
    }
    Ok(deleted)
}

fn user_exists(user_id: i32, conn: &SqliteConnection) -> Result<bool, AppError> {
    let count: i64 = users::table.find(user_id).count().get_result(conn)?;
    Ok(count > 0)
}

fn username_taken(name: &str, conn: &SqliteConnection) -> Result<bool, AppError> {
    let count: i64 = users::table
        .filter(users::username.eq(name))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::setup_pool;
    use crate::password::verify_password;

    fn burger() -> NewFood<'static> {
        NewFood {
            title: "Burger",
            price: "5.99",
            menu_type: "lunch",
            user_fk: None,
        }
    }

    #[test]
    fn added_food_shows_up_in_both_listings() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_food(&conn, &burger()).unwrap();

        let all = find_all_foods(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Burger");
        assert_eq!(all[0].price, "5.99");
        assert_eq!(all[0].menu_type, "lunch");
        assert_eq!(all[0].user_fk, None);

        let lunch = find_foods_by_menu_type(&conn, "lunch").unwrap();
        assert_eq!(lunch, all);
    }

    #[test]
    fn menu_type_filter_is_exact_and_case_sensitive() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        for (title, kind) in [
            ("Burger", "lunch"),
            ("Pancakes", "breakfast"),
            ("Salad", "Lunch"),
            ("Club", "lunchtime"),
            ("Wrap", "lunch"),
        ] {
            let item = NewFood {
                title,
                price: "1.00",
                menu_type: kind,
                user_fk: None,
            };
            create_food(&conn, &item).unwrap();
        }

        let titles: Vec<String> = find_foods_by_menu_type(&conn, "lunch")
            .unwrap()
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["Burger", "Wrap"]);

        assert!(find_foods_by_menu_type(&conn, "dinner").unwrap().is_empty());
    }

    #[test]
    fn duplicate_titles_are_allowed() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_food(&conn, &burger()).unwrap();
        create_food(&conn, &burger()).unwrap();

        assert_eq!(find_all_foods(&conn).unwrap().len(), 2);
    }

    #[test]
    fn food_with_unknown_owner_is_rejected() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        let item = NewFood {
            user_fk: Some(42),
            ..burger()
        };

        assert!(matches!(
            create_food(&conn, &item),
            Err(AppError::UnknownOwner(42))
        ));
        assert!(find_all_foods(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_username_keeps_one_user() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_user(&conn, "ana", "hunter2").unwrap();
        let second = create_user(&conn, "ana", "something else");

        assert!(matches!(second, Err(AppError::DuplicateUsername)));
        let count: i64 = users::table.count().get_result(&conn).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn stored_password_is_a_verifiable_hash() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_user(&conn, "ana", "hunter2").unwrap();
        create_user(&conn, "ben", "hunter2").unwrap();

        let stored: Vec<User> = users::table.order(users::id).load(&conn).unwrap();
        assert_ne!(stored[0].password, "hunter2");
        assert_ne!(stored[0].password, stored[1].password);
        assert!(verify_password("hunter2", &stored[0].password));
        assert!(verify_password("hunter2", &stored[1].password));
    }

    #[test]
    fn find_user_nests_only_their_food() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_user(&conn, "ana", "hunter2").unwrap();
        create_user(&conn, "ben", "hunter2").unwrap();
        create_food(&conn, &NewFood { user_fk: Some(1), ..burger() }).unwrap();
        create_food(
            &conn,
            &NewFood {
                title: "Omelette",
                menu_type: "breakfast",
                user_fk: Some(2),
                ..burger()
            },
        )
        .unwrap();
        create_food(&conn, &burger()).unwrap();

        let ana = find_user(&conn, 1).unwrap().unwrap();
        assert_eq!(ana.username, "ana");
        assert_eq!(ana.meal.len(), 1);
        assert_eq!(ana.meal[0].title, "Burger");
        assert_eq!(ana.meal[0].user_fk, Some(1));

        assert!(find_user(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn deleting_a_user_cascades_to_their_food() {
        let (_test_dir, pool) = setup_pool();
        let conn = pool.get().unwrap();

        create_user(&conn, "ana", "hunter2").unwrap();
        create_food(&conn, &NewFood { user_fk: Some(1), ..burger() }).unwrap();
        create_food(&conn, &NewFood { user_fk: Some(1), ..burger() }).unwrap();
        create_food(&conn, &NewFood { title: "Toast", ..burger() }).unwrap();

        assert_eq!(delete_user(&conn, 1).unwrap(), 1);

        let left = find_all_foods(&conn).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "Toast");
        assert!(find_user(&conn, 1).unwrap().is_none());
        assert_eq!(delete_user(&conn, 1).unwrap(), 0);
    }
}
