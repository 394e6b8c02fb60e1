/// The unparsed CSV body returned by the provider.
///
/// Holds the text exactly as received; [`crate::CsvTableParser`] decides which lines are
/// preamble, header and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    text: String,
}

impl RawTable {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Joins `lines` with `\n`.
    ///
    /// ```
    /// use nsrdb_pv::RawTable;
    ///
    /// let raw = RawTable::from_lines(["a,b", "1,2"]);
    /// assert_eq!(raw.as_str(), "a,b\n1,2");
    /// assert_eq!(raw.line_count(), 2);
    /// ```
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lines without their terminators (`\n` or `\r\n`).
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}
