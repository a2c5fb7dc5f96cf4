// Body formatter trait: turns raw body text into display-ready text.
//
// The timestamp extractor hands its cleaned text to a formatter exactly
// once. Clients with their own markup pass a closure; everything else
// gets PlainFormatter.

/// Converts raw notification text into the text shown to the user.
pub trait BodyFormatter {
    fn format(&self, raw: &str) -> String;
}

impl<F> BodyFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Default formatter: normalizes line endings to `\n` and strips trailing
/// whitespace from every line. Leading indentation is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl BodyFormatter for PlainFormatter {
    fn format(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
        normalized
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
