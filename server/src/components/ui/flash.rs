use maud::{html, Markup, Render};

/// One-shot error banners drained from the session, rendered at the top of a
/// page. Renders nothing when there are no messages.
pub struct FlashList {
    pub messages: Vec<String>,
}

impl FlashList {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl Render for FlashList {
    fn render(&self) -> Markup {
        if self.messages.is_empty() {
            return html! {};
        }

        html! {
            ul class="mb-4 space-y-1" {
                @for message in &self.messages {
                    li class="flash-error rounded-md bg-red-50 border border-red-200 text-red-700 text-sm px-3 py-2" {
                        (message)
                    }
                }
            }
        }
    }
}
