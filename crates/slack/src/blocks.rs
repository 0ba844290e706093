use emojibot_core::StylePreference;
use serde::Serialize;

pub const ACTION_OPEN_DEFAULT_SETTING: &str = "open_default_setting";
pub const ACTION_OPEN_FEEDBACK: &str = "open_feedback";
pub const ACTION_OPEN_WEBSITE: &str = "open_website";
pub const ACTION_FEEDBACK_YES: &str = "feedback_yes";
pub const ACTION_FEEDBACK_NO: &str = "feedback_no";

pub const CALLBACK_DEFAULT_STYLE: &str = "default_style_modal";
pub const CALLBACK_FEEDBACK: &str = "feedback_modal";
pub const CALLBACK_TRANSLATE: &str = "translate_modal";

pub const BLOCK_INPUT_TEXT: &str = "input_text";
pub const ELEMENT_VALUE_INPUT: &str = "value_input";
pub const BLOCK_STYLE_SELECT: &str = "style_select";
pub const ELEMENT_STYLE_CHOICE: &str = "style_choice";
pub const BLOCK_FEEDBACK: &str = "feedback_block";
pub const ELEMENT_FEEDBACK_INPUT: &str = "feedback_input";

pub const FEEDBACK_PROMPT: &str = "*Do you like this translation?*";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text } | Self::Mrkdwn { text } => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    #[serde(rename = "type")]
    kind: &'static str,
    pub action_id: String,
    pub text: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ButtonElement {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: "button",
            action_id: action_id.into(),
            text: TextObject::plain(label),
            style: None,
            value: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: TextObject,
    pub value: String,
}

impl SelectOption {
    pub fn for_style(style: StylePreference) -> Self {
        Self { text: TextObject::plain(style.label()), value: style.as_tag().to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput {
        action_id: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        multiline: bool,
    },
    StaticSelect {
        action_id: String,
        options: Vec<SelectOption>,
    },
}

impl InputElement {
    pub fn text_input(action_id: impl Into<String>) -> Self {
        Self::PlainTextInput { action_id: action_id.into(), multiline: false }
    }

    pub fn multiline_input(action_id: impl Into<String>) -> Self {
        Self::PlainTextInput { action_id: action_id.into(), multiline: true }
    }

    /// Static select listing every style in catalogue order.
    pub fn style_select(action_id: impl Into<String>) -> Self {
        Self::StaticSelect {
            action_id: action_id.into(),
            options: StylePreference::ALL.into_iter().map(SelectOption::for_style).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { block_id: String, text: TextObject },
    Divider,
    Actions { block_id: String, elements: Vec<ButtonElement> },
    Context { block_id: String, elements: Vec<TextObject> },
    Input { block_id: String, label: TextObject, element: InputElement },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub fallback_text: String,
    pub blocks: Vec<Block>,
}

impl MessageTemplate {
    /// Text-only message without blocks.
    pub fn text(text: impl Into<String>) -> Self {
        Self { fallback_text: text.into(), blocks: Vec::new() }
    }
}

pub struct MessageBuilder {
    fallback_text: String,
    blocks: Vec<Block>,
}

impl MessageBuilder {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self { fallback_text: fallback_text.into(), blocks: Vec::new() }
    }

    pub fn section<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut SectionBuilder),
    {
        let mut builder = SectionBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Section { block_id: block_id.into(), text: builder.build() });
        self
    }

    pub fn divider(mut self) -> Self {
        self.blocks.push(Block::Divider);
        self
    }

    pub fn actions<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Actions { block_id: block_id.into(), elements: builder.build() });
        self
    }

    pub fn context<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ContextBuilder),
    {
        let mut builder = ContextBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Context { block_id: block_id.into(), elements: builder.build() });
        self
    }

    pub fn input(
        mut self,
        block_id: impl Into<String>,
        label: impl Into<String>,
        element: InputElement,
    ) -> Self {
        self.blocks.push(Block::Input {
            block_id: block_id.into(),
            label: TextObject::plain(label),
            element,
        });
        self
    }

    pub fn extend(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate { fallback_text: self.fallback_text, blocks: self.blocks }
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

#[derive(Default)]
pub struct SectionBuilder {
    text: Option<TextObject>,
}

impl SectionBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> TextObject {
        self.text.unwrap_or_else(|| TextObject::plain(""))
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }

    fn build(self) -> Vec<ButtonElement> {
        self.elements
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    elements: Vec<TextObject>,
}

impl ContextBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> Vec<TextObject> {
        self.elements
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub callback_id: String,
    pub title: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<TextObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<TextObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<String>,
    pub blocks: Vec<Block>,
}

/// Surface document handed to `views.open` or `views.publish`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum View {
    Home { blocks: Vec<Block> },
    Modal(ModalView),
}

impl View {
    pub fn blocks(&self) -> &[Block] {
        match self {
            Self::Home { blocks } => blocks,
            Self::Modal(modal) => &modal.blocks,
        }
    }

    pub fn callback_id(&self) -> Option<&str> {
        match self {
            Self::Home { .. } => None,
            Self::Modal(modal) => Some(&modal.callback_id),
        }
    }

    pub fn private_metadata(&self) -> Option<&str> {
        match self {
            Self::Home { .. } => None,
            Self::Modal(modal) => modal.private_metadata.as_deref(),
        }
    }
}

const USER_GUIDE: &str = "*User Guide*\nUse these slash commands:\n
• `/text-to-emoji [text]` → Convert text into emojis (quick mode)
• `/emoji-to-text [emoji]` → Interpret emojis back to text (quick mode)

If you type the command without arguments, an interactive modal will appear to choose a *generation style* like ✨ Default, 🐰 Cute, 😂 Funny, or 💼 Formal.";

pub fn home_view(style: StylePreference) -> View {
    let blocks = MessageBuilder::new("Emoji Translator home")
        .section("home.welcome", |section| {
            section.mrkdwn("👋 Welcome to *Emoji Translator*! 🎉");
        })
        .divider()
        .section("home.style", |section| {
            section.mrkdwn(format!("Your current default style: *{}*", style.label()));
        })
        .actions("home.actions", |actions| {
            actions
                .button(ButtonElement::new(ACTION_OPEN_DEFAULT_SETTING, "Change Default Style"))
                .button(ButtonElement::new(ACTION_OPEN_FEEDBACK, "Feedback"))
                .button(ButtonElement::new(ACTION_OPEN_WEBSITE, "Website"));
        })
        .divider()
        .section("home.guide", |section| {
            section.mrkdwn(USER_GUIDE);
        })
        .divider()
        .context("home.tip", |context| {
            context.mrkdwn("_Tip: Return here from the App Home tab for settings and help._");
        })
        .into_blocks();

    View::Home { blocks }
}

/// Home view for a raw stored tag; unrecognised tags render the default label.
pub fn home_view_for_tag(tag: &str) -> View {
    home_view(StylePreference::from_tag_lossy(tag))
}

/// Prompt plus Yes/No buttons, both carrying `text` verbatim as their value.
pub fn feedback_blocks(text: &str) -> Vec<Block> {
    MessageBuilder::new(FEEDBACK_PROMPT)
        .section("feedback.prompt", |section| {
            section.mrkdwn(FEEDBACK_PROMPT);
        })
        .actions("feedback.actions", |actions| {
            actions
                .button(
                    ButtonElement::new(ACTION_FEEDBACK_YES, "Yes")
                        .style(ButtonStyle::Primary)
                        .value(text),
                )
                .button(
                    ButtonElement::new(ACTION_FEEDBACK_NO, "No")
                        .style(ButtonStyle::Danger)
                        .value(text),
                );
        })
        .into_blocks()
}

pub fn feedback_message(text: &str) -> MessageTemplate {
    MessageTemplate { fallback_text: FEEDBACK_PROMPT.to_owned(), blocks: feedback_blocks(text) }
}

pub fn style_setting_modal() -> View {
    View::Modal(ModalView {
        callback_id: CALLBACK_DEFAULT_STYLE.to_owned(),
        title: TextObject::plain("Default Style Setting"),
        submit: Some(TextObject::plain("Save")),
        close: Some(TextObject::plain("Cancel")),
        private_metadata: None,
        blocks: MessageBuilder::new("")
            .input(
                BLOCK_STYLE_SELECT,
                "Choose your default generation style",
                InputElement::style_select(ELEMENT_STYLE_CHOICE),
            )
            .into_blocks(),
    })
}

pub fn feedback_modal() -> View {
    View::Modal(ModalView {
        callback_id: CALLBACK_FEEDBACK.to_owned(),
        title: TextObject::plain("Feedback"),
        submit: Some(TextObject::plain("Submit")),
        close: None,
        private_metadata: None,
        blocks: MessageBuilder::new("")
            .input(
                BLOCK_FEEDBACK,
                "Your feedback",
                InputElement::multiline_input(ELEMENT_FEEDBACK_INPUT),
            )
            .into_blocks(),
    })
}

/// Interactive modal opened by a slash command invoked without text.
pub fn command_modal(callback_id: impl Into<String>, metadata: String) -> View {
    View::Modal(ModalView {
        callback_id: callback_id.into(),
        title: TextObject::plain("Select Generation Style"),
        submit: Some(TextObject::plain("Translate")),
        close: Some(TextObject::plain("Cancel")),
        private_metadata: Some(metadata),
        blocks: MessageBuilder::new("")
            .input(
                BLOCK_INPUT_TEXT,
                "Enter text or emojis",
                InputElement::text_input(ELEMENT_VALUE_INPUT),
            )
            .input(
                BLOCK_STYLE_SELECT,
                "Choose generation style",
                InputElement::style_select(ELEMENT_STYLE_CHOICE),
            )
            .into_blocks(),
    })
}

pub fn shortcut_modal(metadata: String) -> View {
    View::Modal(ModalView {
        callback_id: CALLBACK_TRANSLATE.to_owned(),
        title: TextObject::plain("Translate Text"),
        submit: Some(TextObject::plain("Translate")),
        close: Some(TextObject::plain("Cancel")),
        private_metadata: Some(metadata),
        blocks: MessageBuilder::new("")
            .input(
                BLOCK_INPUT_TEXT,
                "Enter text or emoji",
                InputElement::text_input(ELEMENT_VALUE_INPUT),
            )
            .into_blocks(),
    })
}
