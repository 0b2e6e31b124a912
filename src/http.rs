//! The http seam between the spotify api code and the network.

use std::time::Duration;

use reqwest::{Client, StatusCode};

/// A response with its body already read.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

/// Something that can send the two kinds of requests the spotify api needs.
///
/// Implemented by [`reqwest::Client`]. Tests use a recording fake instead.
pub trait Transport: Sync {
    /// `GET url?query` with `Authorization: Bearer {bearer}`.
    fn get(
        &self,
        url: &str,
        bearer: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = anyhow::Result<Response>> + Send;

    /// `POST url` with a url-encoded `form` body and `Authorization: Basic {basic}`.
    fn post_form(
        &self,
        url: &str,
        basic: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = anyhow::Result<Response>> + Send;
}

impl Transport for Client {
    async fn get(
        &self,
        url: &str,
        bearer: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<Response> {
        let resp = Client::get(self, url)
            .bearer_auth(bearer)
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        Ok(Response { status, body })
    }

    async fn post_form(
        &self,
        url: &str,
        basic: &str,
        form: &[(&str, &str)],
    ) -> anyhow::Result<Response> {
        let resp = Client::post(self, url)
            .header("Authorization", format!("Basic {basic}"))
            .form(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        Ok(Response { status, body })
    }
}

/// Build the [`Client`] used for every request, bounded by `timeout`.
///
/// # Errors
///
/// See [`reqwest::ClientBuilder::build`].
pub fn client(timeout: Duration) -> anyhow::Result<Client> {
    Ok(Client::builder().timeout(timeout).gzip(true).build()?)
}

#[cfg(test)]
pub(crate) mod mock {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use anyhow::anyhow;
    use reqwest::StatusCode;

    use super::{Response, Transport};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Request {
        pub url: String,
        pub auth: String,
        pub params: Vec<(String, String)>,
    }

    #[derive(Clone)]
    enum Reply {
        Respond(StatusCode, String),
        Refuse,
        Hang,
    }

    /// Answers requests by url, counting and recording every call.
    #[derive(Default)]
    pub struct MockTransport {
        routes: HashMap<String, Reply>,
        calls: AtomicUsize,
        requests: Mutex<Vec<Request>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
            let status = StatusCode::from_u16(status).expect("valid status");
            self.routes
                .insert(url.to_string(), Reply::Respond(status, body.to_string()));
            self
        }

        pub fn refuse(mut self, url: &str) -> Self {
            self.routes.insert(url.to_string(), Reply::Refuse);
            self
        }

        /// Never answers `url`.
        pub fn hang(mut self, url: &str) -> Self {
            self.routes.insert(url.to_string(), Reply::Hang);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.lock().expect("not poisoned").clone()
        }

        async fn answer(
            &self,
            url: &str,
            auth: String,
            params: &[(&str, &str)],
        ) -> anyhow::Result<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().expect("not poisoned").push(Request {
                url: url.to_string(),
                auth,
                params: params
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            });

            match self.routes.get(url).cloned() {
                Some(Reply::Respond(status, body)) => Ok(Response { status, body }),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(anyhow!("woke up from hang"))
                }
                Some(Reply::Refuse) | None => Err(anyhow!("connection refused: {url}")),
            }
        }
    }

    impl Transport for MockTransport {
        async fn get(
            &self,
            url: &str,
            bearer: &str,
            query: &[(&str, &str)],
        ) -> anyhow::Result<Response> {
            self.answer(url, format!("Bearer {bearer}"), query).await
        }

        async fn post_form(
            &self,
            url: &str,
            basic: &str,
            form: &[(&str, &str)],
        ) -> anyhow::Result<Response> {
            self.answer(url, format!("Basic {basic}"), form).await
        }
    }
}
