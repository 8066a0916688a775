//! Debug graphics hook

/// Produces the debug-graphics payload attached to an intent.
///
/// Only consulted while the server has debugging enabled for this bot.
/// `render` is called once per sent intent; `clear` right after, whether
/// debugging was enabled or not.
pub trait GraphicsRenderer: Send {
    /// Record one drawing instruction
    fn draw(&mut self, element: &str);
    fn render(&mut self) -> Option<String>;
    fn clear(&mut self);
}

/// Renderer that accumulates raw SVG elements
#[derive(Debug, Default)]
pub struct SvgGraphics {
    elements: Vec<String>,
}

impl SvgGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl GraphicsRenderer for SvgGraphics {
    /// Queue one SVG element, e.g. `<circle cx="10" cy="10" r="5"/>`
    fn draw(&mut self, element: &str) {
        self.elements.push(element.to_string());
    }

    fn render(&mut self) -> Option<String> {
        if self.elements.is_empty() {
            return None;
        }
        Some(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\">{}</svg>",
            self.elements.concat()
        ))
    }

    fn clear(&mut self) {
        self.elements.clear();
    }
}
