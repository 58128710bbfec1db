//! Page body rendering strategy, chosen once at startup.

#[cfg(feature = "markdown")]
use crate::markdown::MarkdownProcessor;

pub enum BodyRenderer {
    /// Full Markdown rendering
    #[cfg(feature = "markdown")]
    Markdown(MarkdownProcessor),
    /// Line breaks become `<br>`; everything else passes through
    LineBreaks,
}

impl BodyRenderer {
    /// The richest renderer this build supports
    pub fn detect() -> Self {
        #[cfg(feature = "markdown")]
        {
            Self::Markdown(MarkdownProcessor::new())
        }
        #[cfg(not(feature = "markdown"))]
        {
            tracing::info!("Built without markdown support; page bodies use line breaks only");
            Self::LineBreaks
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "markdown")]
            Self::Markdown(_) => "markdown",
            Self::LineBreaks => "line-breaks",
        }
    }

    pub fn render(&self, body: &str) -> String {
        match self {
            #[cfg(feature = "markdown")]
            Self::Markdown(processor) => processor.convert(body),
            Self::LineBreaks => body.replace('\n', "<br>"),
        }
    }
}

impl Default for BodyRenderer {
    fn default() -> Self {
        Self::detect()
    }
}
