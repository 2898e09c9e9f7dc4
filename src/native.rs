//! 基于 reqwest 的原生传输层（命令行工具、集成测试）

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};

use crate::error::{ApiError, ApiResult};
use crate::request::{FormPart, HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody};

#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn multipart(parts: Vec<(String, FormPart)>) -> ApiResult<Form> {
    parts.into_iter().try_fold(Form::new(), |form, (name, part)| {
        Ok(match part {
            FormPart::Text(text) => form.text(name, text),
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)
                    .map_err(|e| ApiError::Encode(e.to_string()))?;
                form.part(name, part)
            }
        })
    })
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self.client.request(method(req.method), &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }
        builder = match req.body {
            Some(RequestBody::Json(text)) => builder.body(text),
            // Content-Type 与边界由 reqwest 生成
            Some(RequestBody::Multipart(parts)) => builder.multipart(multipart(parts)?),
            None => builder,
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
