use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::models::{
    AnswerRequest, AnswerResponse, CommandSearchRequest, ExecuteCommandRequest,
    ExecuteCommandResponse, LoginSshRequest, UserIdRequest,
};

// REST client for the training backend
pub struct ApiClient;

impl ApiClient {
    fn api_base_url() -> String {
        super::get_api_base_url()
    }

    /// `GET /api/return_environment` - the full environment list.
    pub async fn return_environment() -> Result<String, JsValue> {
        let url = format!("{}/api/return_environment", Self::api_base_url());
        Self::fetch_json(&url, "GET", None).await
    }

    /// `POST /api/login_ssh` - opens the backend's SSH session for a level.
    /// The response body carries nothing the UI needs; only success matters.
    pub async fn login_ssh(level: &str) -> Result<String, JsValue> {
        let url = format!("{}/api/login_ssh", Self::api_base_url());
        let body = to_body(&LoginSshRequest { level: level.to_string() })?;
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    /// `POST /api/return_commands` - `"all"` returns the whole catalog, any
    /// other term matches that exact command name.
    pub async fn return_commands(search_term: &str) -> Result<String, JsValue> {
        let url = format!("{}/api/return_commands", Self::api_base_url());
        let body = to_body(&CommandSearchRequest { search_term: search_term.to_string() })?;
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    /// `POST /api/execute_command` - runs one materialized command on the
    /// backend and returns its `{success, output}` pair.
    pub async fn execute_command(
        user_id: &str,
        environment_number: &str,
        command_name: &str,
        params: HashMap<String, String>,
    ) -> Result<ExecuteCommandResponse, JsValue> {
        let url = format!("{}/api/execute_command", Self::api_base_url());
        let body = to_body(&ExecuteCommandRequest {
            user_id: user_id.to_string(),
            environment_number: environment_number.to_string(),
            command_name: command_name.to_string(),
            params,
        })?;
        let text = Self::fetch_json(&url, "POST", Some(&body)).await?;
        serde_json::from_str(&text)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse execution response: {}", e)))
    }

    /// `DELETE /api/delete_user_state` - server-side reset, best effort.
    pub async fn delete_user_state(user_id: &str) -> Result<String, JsValue> {
        let url = format!("{}/api/delete_user_state", Self::api_base_url());
        let body = to_body(&UserIdRequest { user_id: user_id.to_string() })?;
        Self::fetch_json(&url, "DELETE", Some(&body)).await
    }

    /// `POST /api/correct_answer` - checks a submitted level answer.
    pub async fn correct_answer(user_id: &str, level: &str, answer: &str) -> Result<bool, JsValue> {
        let url = format!("{}/api/correct_answer", Self::api_base_url());
        let body = to_body(&AnswerRequest {
            user_id: user_id.to_string(),
            level: level.to_string(),
            answer: answer.to_string(),
        })?;
        let text = Self::fetch_json(&url, "POST", Some(&body)).await?;
        let parsed: AnswerResponse = serde_json::from_str(&text)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse answer response: {}", e)))?;
        Ok(parsed.success)
    }

    /// `POST /api/return_ai_pattern` - recommended command sequence.
    pub async fn return_ai_pattern(user_id: &str) -> Result<String, JsValue> {
        let url = format!("{}/api/return_ai_pattern", Self::api_base_url());
        let body = to_body(&UserIdRequest { user_id: user_id.to_string() })?;
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    /// Fire-and-forget user-state reset for page unload. `sendBeacon`
    /// survives the navigation; failures are intentionally ignored.
    pub fn send_delete_user_state_beacon(user_id: &str) {
        let url = format!("{}/api/delete_user_state", Self::api_base_url());
        let body = match to_body(&UserIdRequest { user_id: user_id.to_string() }) {
            Ok(body) => body,
            Err(_) => return,
        };
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().send_beacon_with_opt_str(&url, Some(&body));
        }
    }

    // Helper function to make fetch requests
    pub async fn fetch_json(url: &str, method: &str, body: Option<&str>) -> Result<String, JsValue> {
        use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        if let Some(data) = body {
            let js_body = JsValue::from_str(data);
            opts.set_body(&js_body);
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "API request failed: {} {}",
                resp.status(),
                resp.status_text()
            )));
        }

        // Parse body as text; the caller decodes JSON.
        let text = JsFuture::from(resp.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
