//! Terminator-preserving line sequences.
//!
//! A line ends right after each `\n`, so `\r\n` stays attached to its line
//! and joining every line gives back the original text byte-for-byte.

/// Line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Detect the terminator of a single line, if it has one.
    pub fn detect(line: &str) -> Option<Self> {
        if line.ends_with("\r\n") {
            Some(LineEnding::CrLf)
        } else if line.ends_with('\n') {
            Some(LineEnding::Lf)
        } else {
            None
        }
    }

    /// The terminator bytes.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Borrowed view of text as an ordered sequence of lines.
#[derive(Debug, Clone)]
pub struct LineSeq<'a> {
    text: &'a str,
    /// Exclusive end byte of each line.
    ends: Vec<usize>,
}

impl<'a> LineSeq<'a> {
    /// Split text into lines, keeping every terminator.
    pub fn split(text: &'a str) -> Self {
        let mut ends = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            offset += line.len();
            ends.push(offset);
        }
        Self { text, ends }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// True for empty text.
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// The underlying text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Line `index`, terminator included.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        let end = *self.ends.get(index)?;
        Some(&self.text[self.byte_offset(index)?..end])
    }

    /// Iterate over lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Start byte of line `index`; `index == len()` maps to the end of text.
    ///
    /// Returns `None` past that point.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        match index {
            0 => Some(0),
            i if i <= self.len() => Some(self.ends[i - 1]),
            _ => None,
        }
    }

    /// True when the final line has no terminator.
    pub fn ends_unterminated(&self) -> bool {
        !self.text.is_empty() && !self.text.ends_with('\n')
    }

    /// Ending of the first terminated line.
    pub fn dominant_ending(&self) -> Option<LineEnding> {
        self.iter().find_map(LineEnding::detect)
    }
}
