//! Same-origin calls to the composer backend.

use gloo_net::http::{Request, Response};

use crate::api::{
    decode_account_names, FetchError, PersonalizeRequest, PersonalizeResponse,
    ACCOUNT_NAMES_PATH, FETCH_URL_PATH, PERSONALIZE_PATH,
};

impl From<gloo_net::Error> for FetchError {
    fn from(e: gloo_net::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

async fn ok_body(response: Response) -> Result<String, FetchError> {
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    Ok(response.text().await?)
}

/// Page markup through the backend proxy.
pub(crate) async fn fetch_page(url: &str) -> Result<String, FetchError> {
    let response = Request::get(FETCH_URL_PATH)
        .query([("url", url)])
        .send()
        .await?;
    ok_body(response).await
}

pub(crate) async fn account_names() -> Result<Vec<String>, FetchError> {
    let response = Request::get(ACCOUNT_NAMES_PATH).send().await?;
    let body = ok_body(response).await?;
    Ok(decode_account_names(&body)?)
}

pub(crate) async fn personalize(
    request: &PersonalizeRequest,
) -> Result<PersonalizeResponse, FetchError> {
    let response = Request::post(PERSONALIZE_PATH).json(request)?.send().await?;
    let body = ok_body(response).await?;
    Ok(serde_json::from_str(&body)?)
}
