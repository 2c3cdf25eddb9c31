use crate::process_manager::StreamKind;

/// Append-only text captured from one output channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStreamBuffer {
    text: String,
    chunks: usize,
}

impl RawStreamBuffer {
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
        self.chunks += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.chunks = 0;
    }
}

/// Output of the active run, kept per channel.
///
/// Rendering always sees stdout in full followed by stderr in full, not the
/// order in which chunks arrived across the two channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    stdout: RawStreamBuffer,
    stderr: RawStreamBuffer,
}

impl OutputBuffer {
    pub fn append(&mut self, stream: StreamKind, text: &str) {
        self.stream_mut(stream).append(text);
    }

    pub fn stream(&self, stream: StreamKind) -> &RawStreamBuffer {
        match stream {
            StreamKind::Stdout => &self.stdout,
            StreamKind::Stderr => &self.stderr,
        }
    }

    fn stream_mut(&mut self, stream: StreamKind) -> &mut RawStreamBuffer {
        match stream {
            StreamKind::Stdout => &mut self.stdout,
            StreamKind::Stderr => &mut self.stderr,
        }
    }

    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(self.stdout.as_str());
        combined.push_str(self.stderr.as_str());
        combined
    }

    pub fn total_chunks(&self) -> usize {
        self.stdout.chunks() + self.stderr.chunks()
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }

    /// Only called when a new run starts.
    pub(crate) fn reset(&mut self) {
        self.stdout.clear();
        self.stderr.clear();
    }
}
