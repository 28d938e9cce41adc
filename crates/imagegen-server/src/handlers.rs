//! HTTP request handlers

use axum::{
    body::Bytes,
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::Stream;
use imagegen_agent::{AgentRuntimeError, RequestContext};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::Infallible;
use tokio::task::JoinHandle;

use crate::{models::*, state::AppState};

/// Health check
pub async fn health() -> &'static str {
    "OK"
}

/// Agent card at `/.well-known/agent.json`
pub async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

/// JSON-RPC entry point
///
/// Protocol errors are answered with HTTP 200 and a JSON-RPC error body.
pub async fn jsonrpc(State(state): State<AppState>, body: Bytes) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            return rpc_reply(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::parse_error(e.to_string()),
            ))
        }
    };

    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(e) => {
            return rpc_reply(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(e.to_string()),
            ))
        }
    };

    tracing::debug!(method = %request.method, "JSON-RPC request");

    let method = request.method.clone();
    match method.as_str() {
        "message/send" => send_message(state, request).await,
        "message/stream" => stream_message(state, request),
        "tasks/get" => get_task(state, request),
        "tasks/cancel" => cancel_task(state, request).await,
        other => {
            tracing::warn!("Unknown method {}", other);
            rpc_reply(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::method_not_found(other),
            ))
        }
    }
}

fn rpc_reply(response: JsonRpcResponse) -> Response {
    Json(response).into_response()
}

fn parse_params<T: DeserializeOwned>(request: &JsonRpcRequest) -> Result<T, JsonRpcError> {
    serde_json::from_value(request.params.clone())
        .map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn to_rpc_error(err: &AgentRuntimeError) -> JsonRpcError {
    match err {
        AgentRuntimeError::InvalidRequest(msg) => JsonRpcError::invalid_params(msg.clone()),
        AgentRuntimeError::Unsupported(msg) => JsonRpcError::unsupported_operation(msg.clone()),
        other => JsonRpcError::internal(other.to_string()),
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Register a working task for an incoming message
///
/// A message naming a known task continues it: the message is appended to
/// the task history and the task goes back to working.
fn start_task(state: &AppState, params: MessageSendParams) -> (RequestContext, Task) {
    let mut message = params.message;
    let existing = message.task_id.as_deref().and_then(|id| state.tasks.get(id));
    let task_id = message
        .task_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let context_id = message
        .context_id
        .clone()
        .or_else(|| existing.map(|task| task.context_id))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    message.task_id = Some(task_id.clone());
    message.context_id = Some(context_id.clone());

    let user_input = message.text();
    let task = state.tasks.start(&task_id, &context_id, message);
    let context = RequestContext::new(&task.id, &task.context_id, user_input);
    (context, task)
}

/// Mark a task failed with `reason` as its status message
fn fail_task(state: &AppState, context: &RequestContext, reason: String) -> Task {
    let note = Message::agent_text(reason, &context.context_id, &context.task_id);
    state
        .tasks
        .update_status(&context.task_id, TaskState::Failed, Some(note.clone()))
        .unwrap_or_else(|| {
            let mut task = Task::working(
                context.task_id.clone(),
                context.context_id.clone(),
                note.clone(),
            );
            task.status = TaskStatus::new(TaskState::Failed, Some(note));
            task
        })
}

/// Run the executor and record the outcome on the task
async fn run_task(state: &AppState, context: &RequestContext) -> Result<Message, (Task, AgentRuntimeError)> {
    match state.executor.execute(context).await {
        Ok(reply) => {
            let message = Message::agent_text(reply.text, &context.context_id, &context.task_id);
            state
                .tasks
                .update_status(&context.task_id, TaskState::Completed, Some(message.clone()));
            Ok(message)
        }
        Err(e) => {
            tracing::error!(task_id = %context.task_id, "Task failed: {}", e);
            let task = fail_task(state, context, e.to_string());
            Err((task, e))
        }
    }
}

async fn send_message(state: AppState, request: JsonRpcRequest) -> Response {
    let params: MessageSendParams = match parse_params(&request) {
        Ok(params) => params,
        Err(e) => return rpc_reply(JsonRpcResponse::failure(request.id, e)),
    };

    let (context, _) = start_task(&state, params);
    match run_task(&state, &context).await {
        Ok(message) => rpc_reply(JsonRpcResponse::success(request.id, to_value(&message))),
        Err((_, e)) => rpc_reply(JsonRpcResponse::failure(request.id, to_rpc_error(&e))),
    }
}

fn stream_message(state: AppState, request: JsonRpcRequest) -> Response {
    let params: MessageSendParams = match parse_params(&request) {
        Ok(params) => params,
        Err(e) => return rpc_reply(JsonRpcResponse::failure(request.id, e)),
    };

    let (context, working) = start_task(&state, params);

    // Detached so the task still settles when the client hangs up
    let run = {
        let state = state.clone();
        let context = context.clone();
        tokio::spawn(async move { run_task(&state, &context).await })
    };

    Sse::new(task_events(state, context, working, run, request.id))
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Working status, then the agent message or a final failed status
fn task_events(
    state: AppState,
    context: RequestContext,
    working: Task,
    run: JoinHandle<Result<Message, (Task, AgentRuntimeError)>>,
    id: Value,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let update = TaskStatusUpdateEvent::new(&working, false);
        yield Ok(sse_event(JsonRpcResponse::success(id.clone(), to_value(&update))));

        let envelope = match run.await {
            Ok(Ok(message)) => JsonRpcResponse::success(id, to_value(&message)),
            Ok(Err((task, _))) => {
                JsonRpcResponse::success(id, to_value(&TaskStatusUpdateEvent::new(&task, true)))
            }
            Err(e) => {
                tracing::error!(task_id = %context.task_id, "Task aborted: {}", e);
                let task = fail_task(&state, &context, format!("task aborted: {}", e));
                JsonRpcResponse::success(id, to_value(&TaskStatusUpdateEvent::new(&task, true)))
            }
        };
        yield Ok(sse_event(envelope));
    }
}

fn sse_event(response: JsonRpcResponse) -> Event {
    Event::default()
        .json_data(&response)
        .unwrap_or_else(|e| Event::default().comment(format!("serialization failed: {}", e)))
}

fn get_task(state: AppState, request: JsonRpcRequest) -> Response {
    let params: TaskIdParams = match parse_params(&request) {
        Ok(params) => params,
        Err(e) => return rpc_reply(JsonRpcResponse::failure(request.id, e)),
    };

    match state.tasks.get(&params.id) {
        Some(task) => rpc_reply(JsonRpcResponse::success(request.id, to_value(&task))),
        None => rpc_reply(JsonRpcResponse::failure(
            request.id,
            JsonRpcError::task_not_found(&params.id),
        )),
    }
}

async fn cancel_task(state: AppState, request: JsonRpcRequest) -> Response {
    let params: TaskIdParams = match parse_params(&request) {
        Ok(params) => params,
        Err(e) => return rpc_reply(JsonRpcResponse::failure(request.id, e)),
    };

    let task = state.tasks.get(&params.id);
    let context = match &task {
        Some(task) => RequestContext::new(&task.id, &task.context_id, ""),
        None => RequestContext::new(&params.id, "", ""),
    };

    match (state.executor.cancel(&context).await, task) {
        (Err(e), _) => rpc_reply(JsonRpcResponse::failure(request.id, to_rpc_error(&e))),
        (Ok(()), Some(task)) => rpc_reply(JsonRpcResponse::success(request.id, to_value(&task))),
        (Ok(()), None) => rpc_reply(JsonRpcResponse::failure(
            request.id,
            JsonRpcError::task_not_found(&params.id),
        )),
    }
}
