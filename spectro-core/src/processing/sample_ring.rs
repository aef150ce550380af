/// Fixed-capacity ring of f32 samples shared between the real-time capture
/// callback and a consumer thread. Wrap in `Arc<parking_lot::Mutex<_>>`.
///
/// Two read modes serve the two consumers in the graph:
/// - `pop_into` drains FIFO (the monitor path),
/// - `latest` peeks the newest samples without consuming (the analyzer
///   window, which may be re-read arbitrarily often).
///
/// Writes overwrite the oldest samples on overflow and never allocate.
#[derive(Debug)]
pub struct SampleRing {
    samples: Box<[f32]>,
    /// Index of the oldest unread sample.
    tail: usize,
    /// Number of valid samples, at most `capacity`.
    len: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity.max(1)].into_boxed_slice(),
            tail: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.tail = 0;
        self.len = 0;
        self.samples.fill(0.0);
    }

    /// Append a block, dropping the oldest samples if the ring would
    /// overflow. Blocks longer than the capacity keep only their tail.
    pub fn push(&mut self, block: &[f32]) {
        let cap = self.capacity();
        let block = if block.len() > cap {
            &block[block.len() - cap..]
        } else {
            block
        };
        if block.is_empty() {
            return;
        }

        let head = (self.tail + self.len) % cap;
        let first = (cap - head).min(block.len());
        self.samples[head..head + first].copy_from_slice(&block[..first]);
        self.samples[..block.len() - first].copy_from_slice(&block[first..]);

        let dropped = (self.len + block.len()).saturating_sub(cap);
        self.tail = (self.tail + dropped) % cap;
        self.len = (self.len + block.len()).min(cap);
    }

    /// Downmix interleaved frames to mono and append the result.
    ///
    /// Each frame of `channels` samples is averaged into one ring slot; a
    /// trailing partial frame is ignored.
    pub fn push_frames_mono(&mut self, interleaved: &[f32], channels: usize) {
        if channels <= 1 {
            self.push(interleaved);
            return;
        }
        let cap = self.capacity();
        for frame in interleaved.chunks_exact(channels) {
            let mono = frame.iter().sum::<f32>() / channels as f32;
            let head = (self.tail + self.len) % cap;
            self.samples[head] = mono;
            if self.len == cap {
                self.tail = (self.tail + 1) % cap;
            } else {
                self.len += 1;
            }
        }
    }

    /// Drain up to `out.len()` of the oldest samples into `out`, returning
    /// how many were written. The remainder of `out` is left untouched.
    pub fn pop_into(&mut self, out: &mut [f32]) -> usize {
        let n = out.len().min(self.len);
        let cap = self.capacity();
        let first = (cap - self.tail).min(n);
        out[..first].copy_from_slice(&self.samples[self.tail..self.tail + first]);
        out[first..n].copy_from_slice(&self.samples[..n - first]);
        self.tail = (self.tail + n) % cap;
        self.len -= n;
        n
    }

    /// Copy the newest `out.len()` samples into `out` without consuming
    /// them, preserving arrival order. When fewer samples exist, the front
    /// of `out` is zero-filled so the newest sample always lands last.
    pub fn latest(&self, out: &mut [f32]) {
        let n = out.len().min(self.len);
        let pad = out.len() - n;
        out[..pad].fill(0.0);

        let cap = self.capacity();
        let start = (self.tail + self.len - n) % cap;
        let first = (cap - start).min(n);
        out[pad..pad + first].copy_from_slice(&self.samples[start..start + first]);
        out[pad + first..].copy_from_slice(&self.samples[..n - first]);
    }
}
