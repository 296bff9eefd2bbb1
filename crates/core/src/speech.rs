use purifier_skill_types::response::{OutputSpeech, PlayBehavior};

/// Background loop appended to everything spoken while the purifier is listening.
pub const BG_MUSIC: &str = "<audio src=\"soundbank://soundlibrary/ui/gameshow/amzn_ui_sfx_gameshow_waiting_loop_30s_01\"></audio>";

/// Something the skill wants the device to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speech {
    /// Spoken text followed by the background loop.
    Ambient(String),
    /// Spoken text on its own (prompts, goodbyes, errors).
    Plain(String),
}

impl Speech {
    pub fn ambient(text: impl Into<String>) -> Self {
        Speech::Ambient(text.into())
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Speech::Plain(text.into())
    }
}

/// Renders speech into the SSML body, without the outer `<speak>` element.
pub fn render(speech: &Speech) -> String {
    match speech {
        Speech::Ambient(text) => format!("{}{BG_MUSIC}", escape(text)),
        Speech::Plain(text) => escape(text),
    }
}

pub fn output_speech(speech: &Speech, play_behavior: Option<PlayBehavior>) -> OutputSpeech {
    OutputSpeech::Ssml {
        ssml: format!("<speak>{}</speak>", render(speech)),
        play_behavior,
    }
}

// Gadget payloads are plain text and may contain markup characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
