use crate::config::AdminSeed;
use crate::core::auth::{hash_password, random_salt, verify_password};
use crate::core::models::user::{Insert as UserInsert, Profile, Query as UserQuery, Register, Role, User};
use crate::core::ports::repository::{Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;

fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::BusinessError(format!("{} is required.", field)));
    }
    Ok(())
}

/// Creates an unapproved student account.
pub async fn register<S>(store: &mut S, form: Register) -> Result<i32, Error>
where
    S: Store,
{
    require("Roll number", &form.roll_no)?;
    require("Full name", &form.fullname)?;
    require("Department", &form.dept)?;
    require("Password", &form.password)?;
    let salt = random_salt();
    let id = UserCommon::insert(
        store,
        UserInsert {
            roll_no: form.roll_no.trim().to_owned(),
            fullname: form.fullname.trim().to_owned(),
            email: form.email.trim().to_owned(),
            dept: form.dept.trim().to_owned(),
            password: hash_password(&form.password, &salt),
            salt,
            role: Role::Student,
            is_approved: false,
        },
    )
    .await?;
    log::info!("registered user {} ({}), awaiting approval", id, form.roll_no.trim());
    Ok(id)
}

pub async fn login<S>(store: &mut S, roll_no: &str, password: &str) -> Result<User, Error>
where
    S: Store,
{
    let user = UserCommon::get_by_roll_no(store, roll_no.trim()).await?.ok_or(Error::InvalidCredentials)?;
    if !verify_password(password, &user.salt, &user.password) {
        return Err(Error::InvalidCredentials);
    }
    if !user.is_approved {
        return Err(Error::PendingApproval);
    }
    Ok(user)
}

pub async fn profile<S>(store: &mut S, id: i32) -> Result<Profile, Error>
where
    S: Store,
{
    let user = UserCommon::get(store, id).await?.ok_or(Error::UserNotFound)?;
    Ok(user.into())
}

/// Every non-admin account, unapproved ones first.
pub async fn pending_and_approved<S>(store: &mut S) -> Result<Vec<Profile>, Error>
where
    S: Store,
{
    let users = UserCommon::query(store, UserQuery { role_ne: Some(Role::Admin) }).await?;
    Ok(users.into_iter().map(Profile::from).collect())
}

pub async fn approve_user<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    if !UserCommon::approve(store, id).await? {
        return Err(Error::UserNotFound);
    }
    log::info!("approved user {}", id);
    Ok(())
}

/// Removes the account together with any ballots it cast.
pub async fn reject_user<T>(mut tx: T, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    let votes = VoteCommon::delete_by_student(&mut tx, id).await?;
    if !UserCommon::delete(&mut tx, id).await? {
        tx.rollback().await?;
        return Err(Error::UserNotFound);
    }
    tx.commit().await?;
    log::info!("removed user {} and {} vote(s)", id, votes);
    Ok(())
}

/// Creates the administrator account; an existing admin with the same roll number is kept.
pub async fn bootstrap_admin<S>(store: &mut S, seed: &AdminSeed) -> Result<bool, Error>
where
    S: Store,
{
    let salt = random_salt();
    let created = UserCommon::insert_if_absent(
        store,
        UserInsert {
            roll_no: seed.roll_no.clone(),
            fullname: seed.fullname.clone(),
            email: seed.email.clone(),
            dept: seed.dept.clone(),
            password: hash_password(&seed.password, &salt),
            salt,
            role: Role::Admin,
            is_approved: true,
        },
    )
    .await?;
    if created {
        log::info!("created admin account {}", seed.roll_no);
        return Ok(true);
    }
    match UserCommon::get_by_roll_no(store, &seed.roll_no).await?.map(|u| u.role()).transpose()? {
        Some(Role::Admin) => {
            log::info!("admin account {} already present", seed.roll_no);
            Ok(false)
        }
        _ => Err(Error::ConfigError(format!("roll number {} is taken by a non-admin account", seed.roll_no))),
    }
}
