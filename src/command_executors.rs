//! Executors for the side-effect commands queued by the reducer. Each arm
//! spawns its network work on the local task queue and reports back through
//! `dispatch_global_message`, so no RefCell borrow is held across an await.

use crate::messages::{Command, Message};
use crate::models::{BlockSnapshot, CatalogPayload, EnvironmentsPayload, PatternResponse};
use crate::network::api_client::ApiClient;
use crate::state::{dispatch_global_message, APP_STATE};
use crate::workflow::placeholders;

pub fn execute(cmd: Command) {
    match cmd {
        Command::FetchCatalog => {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::return_commands("all").await {
                    Ok(body) => match serde_json::from_str::<CatalogPayload>(&body) {
                        Ok(payload) => {
                            dispatch_global_message(Message::CatalogLoaded(payload.into_commands()))
                        }
                        Err(_) => dispatch_global_message(Message::CatalogLoadFailed(
                            "invalid data format".to_string(),
                        )),
                    },
                    Err(e) => dispatch_global_message(Message::CatalogLoadFailed(format!(
                        "request failed: {:?}",
                        e
                    ))),
                }
            });
        }
        Command::FetchEnvironments => {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::return_environment().await {
                    Ok(body) => match serde_json::from_str::<EnvironmentsPayload>(&body) {
                        Ok(payload) => dispatch_global_message(Message::EnvironmentsLoaded(
                            payload.environments,
                        )),
                        Err(_) => dispatch_global_message(Message::EnvironmentsLoadFailed(
                            "invalid data format".to_string(),
                        )),
                    },
                    Err(e) => dispatch_global_message(Message::EnvironmentsLoadFailed(format!(
                        "request failed: {:?}",
                        e
                    ))),
                }
            });
        }
        Command::OpenSshSession { level } => {
            wasm_bindgen_futures::spawn_local(async move {
                let ok = ApiClient::login_ssh(&level).await.is_ok();
                dispatch_global_message(Message::SshSessionOpened { level, ok });
            });
        }
        Command::ExecuteBlock(snapshot) => {
            wasm_bindgen_futures::spawn_local(async move {
                let result = execute_snapshot(&snapshot).await;
                dispatch_global_message(Message::ExecutionFinished {
                    command_name: snapshot.name,
                    command: snapshot.command,
                    outcome: result,
                });
            });
        }
        Command::ExecuteChain(snapshots) => {
            // One command at a time, in chain order; each result is appended
            // as it arrives.
            wasm_bindgen_futures::spawn_local(async move {
                for snapshot in snapshots {
                    let result = execute_snapshot(&snapshot).await;
                    dispatch_global_message(Message::ExecutionFinished {
                        command_name: snapshot.name,
                        command: snapshot.command,
                        outcome: result,
                    });
                }
            });
        }
        Command::FetchPattern => {
            let user_id = current_user_id();
            let catalog = APP_STATE.with(|state| state.borrow().catalog.clone());
            wasm_bindgen_futures::spawn_local(async move {
                let body = match ApiClient::return_ai_pattern(&user_id).await {
                    Ok(body) => body,
                    Err(e) => {
                        dispatch_global_message(Message::PatternFetchFailed(format!(
                            "request failed: {:?}",
                            e
                        )));
                        return;
                    }
                };
                let names = match serde_json::from_str::<PatternResponse>(&body) {
                    Ok(pattern) => pattern.pattern,
                    Err(_) => {
                        dispatch_global_message(Message::PatternFetchFailed(
                            "invalid data format".to_string(),
                        ));
                        return;
                    }
                };

                // Resolve each recommended name: the loaded catalog first,
                // the exact-name search endpoint for anything missing.
                let mut descriptors = Vec::with_capacity(names.len());
                for name in names {
                    if let Some(found) = catalog.iter().find(|d| d.command_name == name) {
                        descriptors.push(found.clone());
                        continue;
                    }
                    match ApiClient::return_commands(&name).await {
                        Ok(body) => match serde_json::from_str::<CatalogPayload>(&body) {
                            Ok(payload) => descriptors.extend(payload.into_commands().into_iter().take(1)),
                            Err(_) => web_sys::console::warn_1(
                                &format!("pattern import: unknown command '{}'", name).into(),
                            ),
                        },
                        Err(e) => web_sys::console::warn_1(
                            &format!("pattern import: lookup for '{}' failed: {:?}", name, e).into(),
                        ),
                    }
                }
                dispatch_global_message(Message::PatternResolved(descriptors));
            });
        }
        Command::SubmitAnswer(answer) => {
            let (user_id, level) = current_user_and_level();
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::correct_answer(&user_id, &level, &answer).await {
                    Ok(correct) => dispatch_global_message(Message::AnswerChecked { correct }),
                    Err(e) => {
                        crate::dom_utils::alert(&format!("Answer submission failed: {:?}", e))
                    }
                }
            });
        }
        Command::DeleteUserState => {
            let user_id = current_user_id();
            wasm_bindgen_futures::spawn_local(async move {
                // best effort: a failed reset must not disturb the page
                if let Err(e) = ApiClient::delete_user_state(&user_id).await {
                    web_sys::console::warn_1(&format!("delete_user_state failed: {:?}", e).into());
                }
            });
        }
        Command::ScheduleRechain => {
            wasm_bindgen_futures::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(crate::constants::RECHAIN_SETTLE_MS).await;
                dispatch_global_message(Message::AutoChain);
            });
        }
        // handled inline by the dispatcher
        Command::SendMessage(_) | Command::UpdateUI(_) | Command::NoOp => {}
    }
}

async fn execute_snapshot(snapshot: &BlockSnapshot) -> Result<String, String> {
    let (user_id, level) = current_user_and_level();
    let params = snapshot_params(snapshot);
    ApiClient::execute_command(&user_id, &level, &snapshot.name, params)
        .await
        .map_err(|e| format!("request failed: {:?}", e))?
        .into_outcome()
}

/// Wire params are a name-to-value map; for a repeated placeholder name the
/// later occurrence wins, matching the backend's dict semantics.
fn snapshot_params(snapshot: &BlockSnapshot) -> std::collections::HashMap<String, String> {
    placeholders(&snapshot.template)
        .into_iter()
        .zip(snapshot.parameter_values.iter())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn current_user_id() -> String {
    APP_STATE.with(|state| {
        state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.username.clone())
            .unwrap_or_default()
    })
}

fn current_user_and_level() -> (String, String) {
    APP_STATE.with(|state| {
        let state = state.borrow();
        match &state.session {
            Some(s) => (s.username.clone(), s.level.clone()),
            None => (String::new(), String::new()),
        }
    })
}
