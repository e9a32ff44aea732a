//! Stack traces attached to exceptions.
//!
//! Frames are recorded through [`std::backtrace::Backtrace`] and kept as plain
//! symbol/location pairs so they can be filtered and serialized.
//! Cleaning removes every frame that belongs to this crate or to the backtrace
//! machinery itself, leaving the caller's frames in their original order.

use std::backtrace::Backtrace;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symbol prefixes of frames produced while recording a backtrace.
const CAPTURE_PREFIXES: [&str; 2] = ["std::backtrace", "backtrace::"];

/// One frame of a [`StackTrace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackFrame {
    symbol: String,
    location: Option<String>,
}

impl StackFrame {
    /// Creates a frame without source location.
    #[inline]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), location: None }
    }

    /// Sets the `file:line:column` location of the frame.
    #[inline]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns the demangled symbol.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the source location, if the backtrace resolved one.
    #[inline]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns `true` if the frame belongs to this crate or to backtrace capture.
    pub fn is_internal(&self) -> bool {
        let symbol = self.symbol.strip_prefix('<').unwrap_or(&self.symbol);
        if CAPTURE_PREFIXES.iter().any(|prefix| symbol.starts_with(prefix)) {
            return true;
        }
        symbol
            .strip_prefix(crate_name())
            .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({})", self.symbol, location),
            None => f.write_str(&self.symbol),
        }
    }
}

fn crate_name() -> &'static str {
    let path = module_path!();
    path.split("::").next().unwrap_or(path)
}

/// Ordered frames, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    /// Records the calling thread's stack if `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE` enable it; otherwise returns an empty trace.
    #[inline]
    pub fn capture() -> Self {
        Self::parse(&Backtrace::capture().to_string())
    }

    /// Records the calling thread's stack regardless of the environment.
    #[inline]
    pub fn force_capture() -> Self {
        Self::parse(&Backtrace::force_capture().to_string())
    }

    /// Builds a trace from explicit frames.
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = StackFrame>,
    {
        Self { frames: frames.into_iter().collect() }
    }

    /// Parses the `Display` rendering of a [`Backtrace`].
    ///
    /// Numbered lines start a frame, `at ...` lines attach a location to the
    /// preceding frame and unnumbered symbol lines (inlined functions) become
    /// frames of their own. Renderings of disabled or unsupported backtraces
    /// yield an empty trace.
    ///
    /// # Examples
    ///
    /// ```
    /// use check_rail::StackTrace;
    ///
    /// let trace = StackTrace::parse(
    ///     "   0: app::load\n             at ./src/main.rs:10:5\n   1: app::main\n",
    /// );
    /// assert_eq!(trace.len(), 2);
    /// assert_eq!(trace.frames()[0].location(), Some("./src/main.rs:10:5"));
    /// ```
    pub fn parse(rendered: &str) -> Self {
        let mut frames: Vec<StackFrame> = Vec::new();
        for line in rendered.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(location) = line.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut() {
                    frame.location = Some(location.to_owned());
                }
                continue;
            }
            match line.split_once(": ") {
                Some((index, symbol))
                    if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    frames.push(StackFrame::new(symbol));
                }
                _ if !frames.is_empty() => frames.push(StackFrame::new(line)),
                _ => {}
            }
        }
        Self { frames }
    }

    /// Returns the frames, innermost first.
    #[inline]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Returns the number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frames were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Removes every [internal](StackFrame::is_internal) frame and returns how
    /// many were removed.
    pub fn strip_internal(&mut self) -> usize {
        let before = self.frames.len();
        self.frames.retain(|frame| !frame.is_internal());
        before - self.frames.len()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, frame) in self.frames.iter().enumerate() {
            writeln!(f, "{index:4}: {frame}")?;
        }
        Ok(())
    }
}

impl FromIterator<StackFrame> for StackTrace {
    fn from_iter<I: IntoIterator<Item = StackFrame>>(iter: I) -> Self {
        Self::from_frames(iter)
    }
}
