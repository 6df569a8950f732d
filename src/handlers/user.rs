use serde::Serialize;

use crate::actix_web::{
    web::{Data, Path},
    HttpRequest, HttpResponse,
};
use crate::context::{Admin, UserInfo};
use crate::core::models::user::Profile;
use crate::core::ports::repository::Manager;
use crate::core::services::user::{approve_user, pending_and_approved, profile, reject_user};
use crate::error::{OrRedirect, Rejection};
use crate::response::{redirect_with_notice, render, success, Level, Notice};

const APPROVALS: &str = "/admin/approvals";

pub async fn me<M: Manager + 'static>(req: HttpRequest, user: UserInfo, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect(user.role.home())?;
    let profile = profile(&mut store, user.id).await.or_redirect(user.role.home())?;
    Ok(render(&req, profile))
}

#[derive(Debug, Serialize)]
struct Approvals {
    users: Vec<Profile>,
}

pub async fn approvals<M: Manager + 'static>(req: HttpRequest, _: Admin, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect("/admin_dashboard")?;
    let users = pending_and_approved(&mut store).await.or_redirect("/admin_dashboard")?;
    Ok(render(&req, Approvals { users }))
}

pub async fn approve<M: Manager + 'static>(_: Admin, path: Path<(i32,)>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let (id,) = path.into_inner();
    let mut store = db.acquire().await.or_redirect(APPROVALS)?;
    approve_user(&mut store, id).await.or_redirect(APPROVALS)?;
    Ok(success(APPROVALS, "User account approved successfully!"))
}

pub async fn reject<M: Manager + 'static>(_: Admin, path: Path<(i32,)>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let (id,) = path.into_inner();
    let tx = db.begin().await.or_redirect(APPROVALS)?;
    reject_user(tx, id).await.or_redirect(APPROVALS)?;
    Ok(redirect_with_notice(APPROVALS, Notice::new(Level::Warning, "User account removed.")))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::actix_web::{
        cookie::Cookie,
        test::{call_service, init_service, TestRequest},
        web::get,
        App,
    };
    use crate::core::services::user::{register, test::form};
    use crate::database::memory::MemoryStore;
    use crate::error::Error;
    use crate::handlers::test::{admin_cookie, reply, Reply};
    use crate::middlewares::session::Sessions;

    async fn remove(store: &MemoryStore, sessions: &Sessions, cookie: &Cookie<'static>, id: i32) -> Reply {
        let app = init_service(
            App::new()
                .wrap(sessions.middleware())
                .app_data(Data::new(store.clone()))
                .route("/delete_user/{id}", get().to(reject::<MemoryStore>)),
        )
        .await;
        let req = TestRequest::get().uri(&format!("/delete_user/{}", id)).cookie(cookie.clone()).to_request();
        reply(call_service(&app, req).await).await
    }

    async fn setup(store: MemoryStore) -> (MemoryStore, Sessions, Cookie<'static>, i32) {
        let mut store = store;
        let sessions = Sessions::new(b"secret", 1);
        let cookie = admin_cookie(&mut store, &sessions).await;
        let id = register(&mut store, form("CS001", "CS")).await.unwrap();
        (store, sessions, cookie, id)
    }

    #[actix_web::test]
    async fn test_reject_removes_pending_student() {
        let (store, sessions, cookie, id) = setup(MemoryStore::new()).await;
        let reply = remove(&store, &sessions, &cookie, id).await;
        assert_eq!(reply.location.as_deref(), Some(APPROVALS));
        assert_eq!(reply.notice.unwrap().level, Level::Warning);
        assert!(store.snapshot().users.iter().all(|u| u.id != id));
    }

    #[actix_web::test]
    async fn test_reject_unknown_user_returns_to_approvals() {
        let (store, sessions, cookie, id) = setup(MemoryStore::new()).await;
        let reply = remove(&store, &sessions, &cookie, id + 100).await;
        assert_eq!(reply.location.as_deref(), Some(APPROVALS));
        let notice = reply.notice.unwrap();
        assert_eq!(notice.level, Level::Danger);
        assert_eq!(notice.message, Error::UserNotFound.to_string());
        assert_eq!(store.snapshot().users.len(), 2);
    }

    #[actix_web::test]
    async fn test_failed_delete_hides_cause_and_keeps_user() {
        let (store, sessions, cookie, id) = setup(MemoryStore::new().fail_on("user.delete")).await;
        let reply = remove(&store, &sessions, &cookie, id).await;
        assert_eq!(reply.location.as_deref(), Some(APPROVALS));
        let notice = reply.notice.unwrap();
        assert_eq!(notice.level, Level::Danger);
        assert!(!notice.message.contains("injected"));
        assert!(store.snapshot().users.iter().any(|u| u.id == id));
    }
}
