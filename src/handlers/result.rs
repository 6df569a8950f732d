use crate::actix_web::{
    web::{Data, Path},
    HttpRequest, HttpResponse,
};
use crate::core::ports::repository::Manager;
use crate::core::services::result::tally;
use crate::error::{OrRedirect, Rejection};
use crate::response::render;

/// Public: anyone holding the link may read the tally.
pub async fn results<M: Manager + 'static>(req: HttpRequest, path: Path<(i32,)>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let (election_id,) = path.into_inner();
    let mut store = db.acquire().await.or_redirect("/")?;
    let result = tally(&mut store, election_id).await.or_redirect("/")?;
    Ok(render(&req, result))
}
