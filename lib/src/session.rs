//! 边输入边翻译的会话
//!
//! [`Session`] 持有语言与文本状态，所有修改都发生在持有它的任务上。输入
//! 先经过 [`Debouncer`]，到期后在独立任务里调用 [`Translator`]，结果通过
//! channel 带着代号（generation）送回；代号不是当前代号的结果直接丢弃。

use crate::config::SessionConfig;
use crate::debounce::Debouncer;
use crate::{
    LanguageCode, LanguageSlot, TranslationError, TranslationRequest, TranslationResponse,
    Translator,
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// UI 侧的回调，默认全部为空操作
pub trait SessionObserver: Send {
    fn translated_text_changed(&mut self, _text: &str) {}

    fn source_text_changed(&mut self, _text: &str) {}

    fn languages_changed(&mut self, _source: &LanguageCode, _target: &LanguageCode) {}

    fn loading_changed(&mut self, _loading: bool) {}

    /// 翻译失败时的用户提示
    fn error(&mut self, _message: &str) {}
}

impl SessionObserver for () {}

/// UI 发往会话的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TextChanged(String),
    LanguageSelected(LanguageSlot, LanguageCode),
    Swap,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Translating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub source_text: String,
    pub translated_text: String,
    /// 当前有效请求的代号，同一时刻至多一个
    pub pending: Option<u64>,
}

struct Completion {
    generation: u64,
    result: Result<TranslationResponse, TranslationError>,
}

type PendingRequest = Box<dyn FnOnce() -> TranslationRequest + Send>;

pub struct Session {
    state: SessionState,
    phase: Phase,
    generation: u64,
    debouncer: Debouncer<PendingRequest>,
    translator: Arc<dyn Translator>,
    observer: Box<dyn SessionObserver>,
    in_flight: Option<JoinHandle<()>>,
    completion_tx: UnboundedSender<Completion>,
    completion_rx: UnboundedReceiver<Completion>,
}

impl Session {
    pub fn new(
        translator: Arc<dyn Translator>,
        config: &SessionConfig,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            state: SessionState {
                source_language: config.source_language.clone(),
                target_language: config.target_language.clone(),
                source_text: String::new(),
                translated_text: String::new(),
                pending: None,
            },
            phase: Phase::Idle,
            generation: 0,
            debouncer: Debouncer::new(config.debounce_delay()),
            translator,
            observer,
            in_flight: None,
            completion_tx,
            completion_rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source_text(&self) -> &str {
        &self.state.source_text
    }

    pub fn translated_text(&self) -> &str {
        &self.state.translated_text
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TextChanged(text) => self.on_text_changed(text),
            SessionEvent::LanguageSelected(slot, code) => self.set_language(slot, code),
            SessionEvent::Swap => self.swap_languages(),
            SessionEvent::Clear => self.clear(),
        }
    }

    pub fn on_text_changed(&mut self, text: impl Into<String>) {
        self.state.source_text = text.into();
        self.cancel_work();

        if self.state.source_text.is_empty() {
            self.state.translated_text.clear();
            self.observer.translated_text_changed("");
            return;
        }

        let request = TranslationRequest {
            source_language: self.state.source_language.clone(),
            destination_language: self.state.target_language.clone(),
            text: self.state.source_text.clone(),
        };

        self.generation += 1;
        self.state.pending = Some(self.generation);
        self.debouncer.schedule(Box::new(move || request));
        self.phase = Phase::Debouncing;
    }

    /// 防抖到期：发起翻译请求
    ///
    /// 只在 Debouncing 阶段生效，保证同一时刻至多一个请求在途。
    pub fn on_debounce_elapsed(&mut self, request: TranslationRequest) {
        if self.phase != Phase::Debouncing {
            return;
        }
        let Some(generation) = self.state.pending else {
            return;
        };
        self.debouncer.cancel();

        debug!(
            "Translating #{}: {} -> {}",
            generation, request.source_language, request.destination_language
        );

        self.phase = Phase::Translating;
        self.observer.loading_changed(true);

        let translator = self.translator.clone();
        let sender = self.completion_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = translator.translate(request).await;
            // 会话已销毁时接收端不存在
            let _ = sender.send(Completion { generation, result });
        }));
    }

    pub fn swap_languages(&mut self) {
        let state = &mut self.state;
        std::mem::swap(&mut state.source_language, &mut state.target_language);
        std::mem::swap(&mut state.source_text, &mut state.translated_text);

        self.observer
            .languages_changed(&self.state.source_language, &self.state.target_language);
        self.observer.source_text_changed(&self.state.source_text);
        self.observer
            .translated_text_changed(&self.state.translated_text);

        let text = self.state.source_text.clone();
        self.on_text_changed(text);
    }

    pub fn set_language(&mut self, slot: LanguageSlot, code: LanguageCode) {
        match slot {
            LanguageSlot::Source => self.state.source_language = code,
            LanguageSlot::Destination => self.state.target_language = code,
        }

        self.observer
            .languages_changed(&self.state.source_language, &self.state.target_language);

        let text = self.state.source_text.clone();
        self.on_text_changed(text);
    }

    pub fn clear(&mut self) {
        self.cancel_work();
        self.state.source_text.clear();
        self.state.translated_text.clear();
        self.observer.source_text_changed("");
        self.observer.translated_text_changed("");
    }

    /// 处理下一个内部事件：防抖到期或翻译完成
    ///
    /// 没有待处理的工作时一直挂起。可以安全地放进 `tokio::select!`。
    pub async fn tick(&mut self) {
        tokio::select! {
            request = self.debouncer.fire() => self.on_debounce_elapsed(request),
            Some(completion) = self.completion_rx.recv() => self.apply_completion(completion),
        }
    }

    /// 会话的事件循环，UI 关闭 channel 后返回
    pub async fn run(&mut self, mut events: mpsc::Receiver<SessionEvent>) {
        info!("Translation session started");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                request = self.debouncer.fire() => self.on_debounce_elapsed(request),
                Some(completion) = self.completion_rx.recv() => self.apply_completion(completion),
            }
        }

        self.cancel_work();
        info!("Translation session closed");
    }

    fn apply_completion(&mut self, completion: Completion) {
        if self.state.pending != Some(completion.generation) {
            debug!("Dropping stale translation #{}", completion.generation);
            return;
        }

        self.state.pending = None;
        self.in_flight = None;
        self.phase = Phase::Idle;
        self.observer.loading_changed(false);

        match completion.result {
            Ok(response) => {
                self.state.translated_text = response.destination_text;
                self.observer
                    .translated_text_changed(&self.state.translated_text);
            }
            Err(err) => {
                // 保留上一次的译文
                warn!("Translation #{} failed: {}", completion.generation, err);
                self.observer.error(&err.to_string());
            }
        }
    }

    /// 取消防抖中的和正在进行的请求，回到 Idle
    fn cancel_work(&mut self) {
        self.debouncer.cancel();

        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            self.observer.loading_changed(false);
        }

        self.state.pending = None;
        self.phase = Phase::Idle;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
