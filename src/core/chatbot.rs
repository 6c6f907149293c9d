//! The backend client adapter.
//!
//! `ChatBot` owns the request history sent verbatim to the backend on every
//! turn. Its first entry is always the current system prompt. The display
//! transcript lives separately in [`Chat`](crate::core::conversation::Chat).

use tracing::{debug, info, warn};

use crate::core::backend::{build_backend, ChatBackend, ChatTurn, ConnectedModel};
use crate::core::chat_stream::FragmentStream;
use crate::core::config::defaults::{
    DEFAULT_API_KEY_ENV, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_PORT, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_PORT, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
};
use crate::core::config::{BackendKind, Config};
use crate::core::error::ChatError;
use crate::core::message::Message;
use crate::utils::url::base_url_from_host;

/// Startup values for a [`ChatBot`], resolved from the config file and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatBotSettings {
    pub kind: BackendKind,
    pub host: Option<String>,
    pub openai_model: String,
    pub ollama_model: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub api_key_env: String,
}

impl Default for ChatBotSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ChatBotSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            kind: config.backend.unwrap_or_default(),
            host: config.host.clone(),
            openai_model: config
                .openai_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            ollama_model: config
                .ollama_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            api_key_env: config
                .api_key_env
                .clone()
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        }
    }

    fn default_model(&self, kind: BackendKind) -> &str {
        match kind {
            BackendKind::OpenAi => &self.openai_model,
            BackendKind::Ollama => &self.ollama_model,
        }
    }
}

pub struct ChatBot {
    settings: ChatBotSettings,
    /// Host from the settings, resolved for `settings.kind`.
    configured_host: Option<String>,
    kind: BackendKind,
    host: Option<String>,
    model: String,
    temperature: f64,
    system_prompt: String,
    history: Vec<Message>,
    backend: Option<Box<dyn ChatBackend>>,
}

impl ChatBot {
    pub fn new(settings: ChatBotSettings) -> Self {
        let kind = settings.kind;
        let configured_host = settings.host.as_deref().and_then(|host| {
            resolve_host(kind, host)
                .inspect_err(|e| warn!("Ignoring configured host: {e}"))
                .ok()
        });

        let mut bot = Self {
            kind,
            configured_host,
            host: None,
            model: settings.default_model(kind).to_string(),
            temperature: settings.temperature,
            system_prompt: String::new(),
            history: Vec::new(),
            backend: None,
            settings,
        };
        bot.host = bot.default_host(kind);
        bot.set_system_prompt(bot.settings.system_prompt.clone());
        bot.rebuild_client();
        bot
    }

    /// Point the current backend kind at a new host or URL.
    ///
    /// A missing API key is not an error: the client is left unset and
    /// [`send_user_request`](Self::send_user_request) returns `None`.
    pub fn set_backend_host(&mut self, host_or_url: &str) -> Result<(), ChatError> {
        let base_url = resolve_host(self.kind, host_or_url)?;
        info!(kind = %self.kind, host = %base_url, "Backend host configured");
        self.host = Some(base_url);
        self.rebuild_client();
        Ok(())
    }

    pub fn toggle_backend_kind(&mut self) {
        self.kind = self.kind.toggled();
        self.host = self.default_host(self.kind);
        self.model = self.settings.default_model(self.kind).to_string();
        info!(kind = %self.kind, "Backend kind toggled");
        self.rebuild_client();
    }

    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.system_prompt = system_prompt.into();
        self.history.retain(|message| !message.is_system_role());
        self.history.insert(0, Message::from_system_prompt(self.system_prompt.clone()));
    }

    /// Stored as given; range checks belong to the caller.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub async fn connected_model(&self) -> Result<Option<ConnectedModel>, ChatError> {
        match &self.backend {
            Some(backend) => backend.connected_model(&self.model).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn list_models(&self) -> Result<Option<Vec<String>>, ChatError> {
        match &self.backend {
            Some(backend) => backend.list_models().await.map(Some),
            None => Ok(None),
        }
    }

    /// Record a user turn and start streaming the reply.
    ///
    /// Returns `None` when no client is configured. The history is updated
    /// before the stream is returned, and the stream holds no reference to
    /// `self`.
    pub fn send_user_request(&mut self, request: &str) -> Option<FragmentStream> {
        if self.history.last().is_some_and(Message::is_user_role) {
            warn!("Removing latest user message to avoid duplications");
            self.history.pop();
        }
        self.history.push(Message::from_user(request));

        let Some(backend) = &self.backend else {
            debug!("No backend client configured; request not sent");
            return None;
        };

        let turn = ChatTurn {
            model: self.model.clone(),
            messages: self
                .history
                .iter()
                .filter(|message| message.is_chat_role())
                .map(Message::to_wire_record)
                .collect(),
            temperature: self.temperature,
        };
        debug!(messages = turn.messages.len(), model = %turn.model, "Sending chat request");
        Some(backend.stream_chat(turn))
    }

    pub fn append_assistant_reply(&mut self, reply: impl Into<String>) {
        self.history.push(Message::from_assistant(reply));
    }

    /// Append an already-built chat message, such as a failure record.
    pub fn append_message(&mut self, message: Message) {
        if message.is_chat_role() {
            self.history.push(message);
        } else {
            debug!(role = %message.role(), "Skipping non-chat message for request history");
        }
    }

    /// Drop every turn, keeping only the system prompt.
    pub fn clear(&mut self) {
        self.history.clear();
        self.history.push(Message::from_system_prompt(self.system_prompt.clone()));
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn request_history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    fn default_host(&self, kind: BackendKind) -> Option<String> {
        if kind == self.settings.kind {
            if let Some(host) = &self.configured_host {
                return Some(host.clone());
            }
        }
        match kind {
            BackendKind::OpenAi => Some(DEFAULT_OPENAI_BASE_URL.to_string()),
            BackendKind::Ollama => None,
        }
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    fn rebuild_client(&mut self) {
        let api_key = match self.kind {
            BackendKind::OpenAi => {
                let key = self.api_key();
                if key.is_none() {
                    warn!(
                        "{} is not set; OpenAI-compatible client disabled",
                        self.settings.api_key_env
                    );
                }
                key
            }
            BackendKind::Ollama => None,
        };
        self.backend = self
            .host
            .as_deref()
            .and_then(|host| build_backend(self.kind, host, api_key));
    }
}

fn resolve_host(kind: BackendKind, host_or_url: &str) -> Result<String, ChatError> {
    let resolved = match kind {
        BackendKind::OpenAi => base_url_from_host(host_or_url, DEFAULT_OPENAI_PORT, "/v1"),
        BackendKind::Ollama => base_url_from_host(host_or_url, DEFAULT_OLLAMA_PORT, ""),
    };
    resolved.map_err(|reason| ChatError::invalid_host(host_or_url.trim(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Role, Severity};
    use crate::utils::test_utils::{
        create_disconnected_bot, set_test_key, spawn_mock_server, test_settings, MockResponse,
    };
    use futures_util::{StreamExt, TryStreamExt};

    fn roles(bot: &ChatBot) -> Vec<Role> {
        bot.request_history().iter().map(Message::role).collect()
    }

    #[test]
    fn starts_with_system_prompt_and_openai_defaults() {
        let bot = create_disconnected_bot();
        assert_eq!(roles(&bot), vec![Role::System]);
        assert_eq!(bot.system_prompt(), "You are a test assistant.");
        assert_eq!(bot.kind(), BackendKind::OpenAi);
        assert_eq!(bot.host(), Some(DEFAULT_OPENAI_BASE_URL));
        assert_eq!(bot.model(), "test-model");
        assert_eq!(bot.temperature(), 0.2);
        assert!(!bot.is_connected());
    }

    #[test]
    fn setting_system_prompt_twice_leaves_one_at_the_front() {
        let mut bot = create_disconnected_bot();
        bot.append_assistant_reply("earlier reply");
        bot.set_system_prompt("first");
        bot.set_system_prompt("second");

        let systems: Vec<&Message> = bot
            .request_history()
            .iter()
            .filter(|message| message.is_system_role())
            .collect();
        assert_eq!(systems.len(), 1);
        assert_eq!(bot.request_history()[0].content(), "second");
        assert_eq!(bot.system_prompt(), "second");
        assert_eq!(roles(&bot), vec![Role::System, Role::Assistant]);
    }

    #[test]
    fn consecutive_user_turns_keep_only_the_latest() {
        let mut bot = create_disconnected_bot();
        assert!(bot.send_user_request("first").is_none());
        assert!(bot.send_user_request("second").is_none());

        let history = bot.request_history();
        assert_eq!(history.len(), 2);
        let tail = history.last().unwrap();
        assert!(tail.is_user_role());
        assert_eq!(tail.content(), "second");
    }

    #[test]
    fn user_turns_after_replies_are_kept() {
        let mut bot = create_disconnected_bot();
        bot.send_user_request("q1");
        bot.append_assistant_reply("a1");
        bot.send_user_request("q2");
        assert_eq!(
            roles(&bot),
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
    }

    #[test]
    fn set_temperature_trusts_its_caller() {
        let mut bot = create_disconnected_bot();
        bot.set_temperature(0.9);
        assert_eq!(bot.temperature(), 0.9);
    }

    #[test]
    fn toggling_twice_restores_host_and_model() {
        let mut bot = create_disconnected_bot();
        let host = bot.host().map(str::to_string);
        let model = bot.model().to_string();

        bot.toggle_backend_kind();
        assert_eq!(bot.kind(), BackendKind::Ollama);
        assert_eq!(bot.host(), None);
        assert_eq!(bot.model(), "llama-test");
        assert!(!bot.is_connected());

        bot.toggle_backend_kind();
        assert_eq!(bot.kind(), BackendKind::OpenAi);
        assert_eq!(bot.host().map(str::to_string), host);
        assert_eq!(bot.model(), model);
    }

    #[test]
    fn ollama_hosts_default_the_port_and_connect_without_key() {
        let mut bot = create_disconnected_bot();
        bot.toggle_backend_kind();
        bot.set_backend_host("gpu-box").unwrap();
        assert_eq!(bot.host(), Some("http://gpu-box:11434"));
        assert!(bot.is_connected());

        bot.set_backend_host("http://other:1234/").unwrap();
        assert_eq!(bot.host(), Some("http://other:1234"));
    }

    #[test]
    fn openai_host_without_key_yields_no_client() {
        let mut bot = create_disconnected_bot();
        bot.set_backend_host("vllm-box").unwrap();
        assert_eq!(bot.host(), Some("http://vllm-box:8000/v1"));
        assert!(!bot.is_connected());
    }

    #[test]
    fn openai_host_with_key_builds_a_client() {
        set_test_key("CAUSERIE_TEST_KEY_CHATBOT_CONNECT");
        let mut bot = ChatBot::new(test_settings("CAUSERIE_TEST_KEY_CHATBOT_CONNECT"));
        assert!(bot.is_connected());
        bot.set_backend_host("vllm-box:9000").unwrap();
        assert!(bot.is_connected());
        assert_eq!(bot.host(), Some("http://vllm-box:9000/v1"));
    }

    #[test]
    fn invalid_hosts_leave_state_unchanged() {
        let mut bot = create_disconnected_bot();
        let error = bot.set_backend_host("   ").unwrap_err();
        assert!(matches!(error, ChatError::InvalidHost { .. }));
        assert_eq!(bot.host(), Some(DEFAULT_OPENAI_BASE_URL));
    }

    #[test]
    fn configured_host_is_the_home_host() {
        let mut settings = test_settings("CAUSERIE_TEST_KEY_NEVER_SET");
        settings.kind = BackendKind::Ollama;
        settings.host = Some("localhost".to_string());
        let mut bot = ChatBot::new(settings);
        assert_eq!(bot.host(), Some("http://localhost:11434"));

        bot.toggle_backend_kind();
        bot.toggle_backend_kind();
        assert_eq!(bot.host(), Some("http://localhost:11434"));
    }

    #[test]
    fn clear_keeps_only_the_system_prompt() {
        let mut bot = create_disconnected_bot();
        bot.send_user_request("hello");
        bot.append_assistant_reply("hi");
        bot.clear();
        assert_eq!(roles(&bot), vec![Role::System]);
        assert_eq!(bot.request_history()[0].content(), bot.system_prompt());
    }

    #[test]
    fn append_message_ignores_app_messages() {
        let mut bot = create_disconnected_bot();
        bot.append_message(Message::from_app_notice("banner"));
        bot.append_message(Message::from_failure("Cannot interact with LLM", &"down"));
        assert_eq!(roles(&bot), vec![Role::System, Role::Assistant]);
        assert_eq!(bot.request_history()[1].severity(), Severity::Error);
    }

    #[tokio::test]
    async fn connected_model_is_none_without_client() {
        let bot = create_disconnected_bot();
        assert_eq!(bot.connected_model().await.unwrap(), None);
        assert_eq!(bot.list_models().await.unwrap(), None);
    }

    #[tokio::test]
    async fn connected_model_propagates_connection_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut bot = create_disconnected_bot();
        bot.toggle_backend_kind();
        bot.set_backend_host(&format!("http://{addr}")).unwrap();

        assert!(matches!(
            bot.connected_model().await,
            Err(ChatError::Http(_))
        ));
    }

    #[tokio::test]
    async fn send_user_request_streams_the_full_history() {
        let body = concat!(
            "{\"message\":{\"content\":\"Hel\"},\"done\":false}\n",
            "{\"message\":{\"content\":\"lo\"},\"done\":true}\n",
        );
        let server =
            spawn_mock_server(vec![MockResponse::ok("application/x-ndjson", body)]).await;

        let mut bot = create_disconnected_bot();
        bot.toggle_backend_kind();
        bot.set_backend_host(&server.base_url).unwrap();
        bot.set_temperature(0.7);

        let stream = bot.send_user_request("Say hello").expect("client configured");
        // History is already updated before any fragment is pulled.
        assert_eq!(roles(&bot), vec![Role::System, Role::User]);

        let reply: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(reply.concat(), "Hello");
        bot.append_assistant_reply(reply.concat());
        assert_eq!(roles(&bot), vec![Role::System, Role::User, Role::Assistant]);

        let json = server.requests().await[0].json();
        assert_eq!(json["model"], "llama-test");
        assert_eq!(json["options"]["temperature"], 0.7);
        assert_eq!(json["messages"][0]["content"], "You are a test assistant.");
        assert_eq!(json["messages"][1]["content"], "Say hello");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn streaming_failures_reach_the_consumer() {
        let server = spawn_mock_server(vec![MockResponse::status(
            404,
            r#"{"error":"model \"llama-test\" not found"}"#,
        )])
        .await;

        let mut bot = create_disconnected_bot();
        bot.toggle_backend_kind();
        bot.set_backend_host(&server.base_url).unwrap();

        let mut stream = bot.send_user_request("hi").expect("client configured");
        match stream.next().await {
            Some(Err(ChatError::Api { status, body })) => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_replies_produce_an_empty_stream() {
        let server = spawn_mock_server(vec![MockResponse::ok(
            "application/x-ndjson",
            "{\"message\":{\"content\":\"\"},\"done\":true}\n",
        )])
        .await;

        let mut bot = create_disconnected_bot();
        bot.toggle_backend_kind();
        bot.set_backend_host(&server.base_url).unwrap();

        let reply: Vec<String> = bot
            .send_user_request("hi")
            .expect("client configured")
            .try_collect()
            .await
            .unwrap();
        assert!(reply.is_empty());
    }
}
