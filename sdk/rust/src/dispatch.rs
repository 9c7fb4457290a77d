//! Signed request assembly and dispatch.

use std::fmt::Debug;

use md5::{Digest, Md5};
use serde::Serialize;
use tracing::{debug, error};

use crate::config::{Endpoint, APP_ID_PLACEHOLDER};
use crate::error::{BroadcasttError, Result};
use crate::signer::{QueryParams, Signer};
use crate::transport::{Method, Request, Response, Transport};

/// Value of the `X-Library` header.
pub const LIBRARY_HEADER: &str = concat!("broadcastt-rust ", env!("CARGO_PKG_VERSION"));

/// Borrowed view over a client's credentials, endpoint and transport.
pub(crate) struct Dispatcher<'a> {
    pub(crate) app_id: &'a str,
    pub(crate) signer: &'a Signer,
    pub(crate) endpoint: &'a Endpoint,
    pub(crate) transport: &'a dyn Transport,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn build_uri(&self) -> Result<String> {
        self.endpoint.build_uri()
    }

    /// Sign `path` and produce an unsent request against `domain`.
    pub(crate) fn build_request(
        &self,
        domain: &str,
        path: &str,
        method: Method,
        query_params: &QueryParams,
    ) -> Request {
        let path = path.replace(APP_ID_PLACEHOLDER, self.app_id);

        let signed_query =
            self.signer
                .build_auth_query_string(method.as_str(), &path, query_params, None);

        let uri = format!("{}{}?{}", domain, path, signed_query);
        debug!(%method, %uri, "built request");

        Request {
            method,
            uri,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Library".to_string(), LIBRARY_HEADER.to_string()),
            ],
            body: None,
            timeout: self.endpoint.timeout,
        }
    }

    /// Hand a request to the transport.
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        let method = request.method;
        let uri = request.uri.clone();
        debug!(%method, %uri, "sending request");

        match self.transport.send(request).await {
            Ok(response) => {
                debug!(%method, %uri, status = response.status, "received response");
                Ok(response)
            }
            Err(err) => {
                error!(%method, %uri, error = %err, "request failed");
                Err(err.into())
            }
        }
    }

    /// POST a JSON body to `{base_path}{path}`.
    ///
    /// The body's MD5 is added as the signed `body_md5` parameter.
    pub(crate) async fn post<B>(
        &self,
        path: &str,
        mut query_params: QueryParams,
        body: &B,
    ) -> Result<Response>
    where
        B: Serialize + Debug,
    {
        let path = format!("{}{}", self.endpoint.base_path, path);
        let body = encode_json(body)?;

        query_params.insert("body_md5", body_md5(&body));

        let request = self
            .build_request(&self.build_uri()?, &path, Method::Post, &query_params)
            .with_body(body);

        self.send(request).await
    }

    /// GET `{base_path}{path}` with the given query parameters signed in.
    pub(crate) async fn get(&self, path: &str, query_params: &QueryParams) -> Result<Response> {
        let path = format!("{}{}", self.endpoint.base_path, path);
        let request = self.build_request(&self.build_uri()?, &path, Method::Get, query_params);

        self.send(request).await
    }
}

/// JSON-encode `value`, keeping a rendering of it on failure.
pub(crate) fn encode_json<T: Serialize + Debug + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        error!(data = ?value, error = %e, "failed to JSON encode data");
        BroadcasttError::json_encode(&value, e)
    })
}

/// Lowercase hex MD5 of a request body.
pub fn body_md5(body: &str) -> String {
    hex::encode(Md5::digest(body.as_bytes()))
}
