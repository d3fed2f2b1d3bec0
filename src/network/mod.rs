// Re-export network modules
pub mod api_client;

pub use api_client::ApiClient;

// Helper function to get the API base URL. Debug builds talk to the local
// development backend; release builds are served from the same origin as
// the API.
pub(crate) fn get_api_base_url() -> String {
    #[cfg(debug_assertions)]
    {
        "http://127.0.0.1:8000".to_string()
    }
    #[cfg(not(debug_assertions))]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://127.0.0.1:8000".to_string())
    }
}
