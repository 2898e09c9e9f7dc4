//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`]。

use rencontre::{ApiError, ApiResult, FormPart, HttpClient, HttpRequest, HttpResponse, RequestBody};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn build_error(context: &str, e: JsValue) -> ApiError {
    ApiError::Transport(format!("{}: {:?}", context, e))
}

/// 构建 multipart 表单；`Content-Type` 与边界由浏览器生成
fn form_data(parts: &[(String, FormPart)]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for (name, part) in parts {
        match part {
            FormPart::Text(text) => form.append_with_str(name, text)?,
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let chunks = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                options.set_type(mime);
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &options)?;
                form.append_with_blob_and_filename(name, &blob, file_name)?;
            }
        }
    }
    Ok(form)
}

/// 基于 `window.fetch` 的传输层
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| build_error("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| build_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(text)) => opts.set_body(&JsValue::from_str(text)),
            Some(RequestBody::Multipart(parts)) => {
                let form = form_data(parts).map_err(|e| build_error("构建表单失败", e))?;
                opts.set_body(&form.into());
            }
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| build_error("请求构建失败", e))?;

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Transport("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| build_error("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| build_error("Response 类型转换失败", e))?;

        let promise = response
            .text()
            .map_err(|e| build_error("读取响应失败", e))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| build_error("读取响应失败", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse {
            status: response.status(),
            body,
        })
    }
}
