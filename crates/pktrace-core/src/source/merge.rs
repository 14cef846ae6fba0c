use std::cmp::Ordering;

use super::{Frame, PacketSource, SourceError};

/// Total order used to merge frames from several files: timestamp, then
/// file index, then position within the file.
pub fn frame_order(a: &Frame, b: &Frame) -> Ordering {
    a.timestamp_ns
        .cmp(&b.timestamp_ns)
        .then(a.source.cmp(&b.source))
        .then(a.sequence.cmp(&b.sequence))
}

/// Timestamp-ordered merge over several sources.
///
/// Each source keeps one frame of lookahead. Files whose time ranges do not
/// overlap come out concatenated; overlapping files come out interleaved.
/// Frames keep their in-file order even when a file's own timestamps go
/// backwards.
pub struct MergedSource<S> {
    sources: Vec<S>,
    pending: Vec<Option<Frame>>,
    primed: bool,
}

impl<S: PacketSource> MergedSource<S> {
    pub fn new(sources: Vec<S>) -> Self {
        let pending = sources.iter().map(|_| None).collect();
        Self {
            sources,
            pending,
            primed: false,
        }
    }

    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    fn pull(&mut self, index: usize) -> Result<Option<Frame>, SourceError> {
        let frame = self.sources[index].next_frame()?;
        Ok(frame.map(|mut frame| {
            frame.source = index;
            frame
        }))
    }

    fn prime(&mut self) -> Result<(), SourceError> {
        for index in 0..self.sources.len() {
            self.pending[index] = self.pull(index)?;
        }
        self.primed = true;
        Ok(())
    }
}

impl<S: PacketSource> PacketSource for MergedSource<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if !self.primed {
            self.prime()?;
        }
        let next = self
            .pending
            .iter()
            .enumerate()
            .filter_map(|(index, frame)| frame.as_ref().map(|frame| (index, frame)))
            .min_by(|(_, a), (_, b)| frame_order(a, b))
            .map(|(index, _)| index);
        let Some(index) = next else {
            return Ok(None);
        };
        let frame = self.pending[index].take();
        self.pending[index] = self.pull(index)?;
        Ok(frame)
    }

    fn progress(&self) -> (u64, u64) {
        self.sources
            .iter()
            .map(PacketSource::progress)
            .fold((0, 0), |(done, total), (d, t)| (done + d, total + t))
    }
}
