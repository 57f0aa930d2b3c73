//! Flex message block structure.
//!
//! Serde types for the subset of LINE's flex message format the order
//! notifications use: a single bubble with box/text/image/button/separator
//! components. Builder-style setters keep the template code close to the
//! shape of the JSON it produces.

use serde::Serialize;

/// Top-level flex container.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexContainer {
    Bubble(Bubble),
}

impl FlexContainer {
    /// Wrap a bubble.
    #[must_use]
    pub const fn bubble(bubble: Bubble) -> Self {
        Self::Bubble(bubble)
    }
}

/// A flex bubble: optional header, body, and footer blocks.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Bubble {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<FlexBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<FlexBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FlexBox>,
}

impl Bubble {
    /// A kilo-sized bubble, the size the order notifications use.
    #[must_use]
    pub fn kilo() -> Self {
        Self {
            size: Some("kilo".to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn header(mut self, header: FlexBox) -> Self {
        self.header = Some(header);
        self
    }

    #[must_use]
    pub fn body(mut self, body: FlexBox) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn footer(mut self, footer: FlexBox) -> Self {
        self.footer = Some(footer);
        self
    }
}

/// Any flex component.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    Box(FlexBox),
    Text(FlexText),
    Image(FlexImage),
    Button(FlexButton),
    Separator(FlexSeparator),
}

/// A box laying out child components vertically or horizontally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexBox {
    pub layout: String,
    pub contents: Vec<FlexComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_all: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<i32>,
}

impl FlexBox {
    #[must_use]
    pub fn vertical(contents: Vec<FlexComponent>) -> Self {
        Self::new("vertical", contents)
    }

    #[must_use]
    pub fn horizontal(contents: Vec<FlexComponent>) -> Self {
        Self::new("horizontal", contents)
    }

    fn new(layout: &str, contents: Vec<FlexComponent>) -> Self {
        Self {
            layout: layout.to_owned(),
            contents,
            margin: None,
            background_color: None,
            padding_all: None,
            flex: None,
        }
    }

    #[must_use]
    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_owned());
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_owned());
        self
    }

    #[must_use]
    pub fn padding_all(mut self, padding: &str) -> Self {
        self.padding_all = Some(padding.to_owned());
        self
    }

    #[must_use]
    pub const fn flex(mut self, flex: i32) -> Self {
        self.flex = Some(flex);
        self
    }

    /// Wrap into a [`FlexComponent`] for nesting.
    #[must_use]
    pub fn component(self) -> FlexComponent {
        FlexComponent::Box(self)
    }
}

/// A text component.
#[derive(Debug, Clone, Serialize)]
pub struct FlexText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<i32>,
}

impl FlexText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: None,
            size: None,
            color: None,
            wrap: false,
            align: None,
            margin: None,
            flex: None,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.weight = Some("bold".to_owned());
        self
    }

    #[must_use]
    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_owned());
        self
    }

    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    #[must_use]
    pub const fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    #[must_use]
    pub fn align_end(mut self) -> Self {
        self.align = Some("end".to_owned());
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_owned());
        self
    }

    #[must_use]
    pub const fn flex(mut self, flex: i32) -> Self {
        self.flex = Some(flex);
        self
    }

    /// Wrap into a [`FlexComponent`] for nesting.
    #[must_use]
    pub fn component(self) -> FlexComponent {
        FlexComponent::Text(self)
    }
}

/// An image component.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<i32>,
}

impl FlexImage {
    /// A square cover thumbnail, as the per-item product image renders.
    #[must_use]
    pub fn thumbnail(url: impl Into<String>, size: &str) -> Self {
        Self {
            url: url.into(),
            size: Some(size.to_owned()),
            aspect_ratio: Some("1:1".to_owned()),
            aspect_mode: Some("cover".to_owned()),
            flex: Some(0),
        }
    }

    /// Wrap into a [`FlexComponent`] for nesting.
    #[must_use]
    pub fn component(self) -> FlexComponent {
        FlexComponent::Image(self)
    }
}

/// A button with a postback action.
#[derive(Debug, Clone, Serialize)]
pub struct FlexButton {
    pub action: FlexAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

impl FlexButton {
    #[must_use]
    pub const fn postback(action: FlexAction) -> Self {
        Self {
            action,
            style: None,
            color: None,
            margin: None,
        }
    }

    #[must_use]
    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_owned());
        self
    }

    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_owned());
        self
    }

    /// Wrap into a [`FlexComponent`] for nesting.
    #[must_use]
    pub fn component(self) -> FlexComponent {
        FlexComponent::Button(self)
    }
}

/// A button action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexAction {
    /// Posts `data` back to the webhook when pressed.
    Postback { label: String, data: String },
}

/// A separator line.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FlexSeparator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

impl FlexSeparator {
    #[must_use]
    pub fn margin(margin: &str) -> FlexComponent {
        FlexComponent::Separator(Self {
            margin: Some(margin.to_owned()),
        })
    }
}
