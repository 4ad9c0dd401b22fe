use crate::animation::values::Interpolatable;

/// Remembers the last bracketing segment of a curve.
///
/// Playback samples times that move almost monotonically frame to frame, so
/// re-checking the cached segment (and its successor) hits far more often
/// than a fresh binary search. Cursors never change sampling results, only
/// the lookup cost; keep one per curve being played back.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    last_index: usize,
}

/// A time-indexed interpolation curve for a single animated property.
///
/// Keyframes are kept sorted by time with strictly increasing timestamps.
/// Sampling clamps outside the keyed range: before the first keyframe the
/// first value is returned, after the last keyframe the last value.
#[derive(Debug, Clone)]
pub struct KeyframeCurve<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Interpolatable> Default for KeyframeCurve<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Interpolatable> KeyframeCurve<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Inserts a sample, keeping timestamps strictly increasing.
    ///
    /// Samples may arrive in any order; the insert position is found by
    /// binary search, so in-order insertion (the loader hot path) stays
    /// O(1) amortized. A sample at an already-keyed time replaces the
    /// stored value.
    pub fn add_keyframe(&mut self, time: f32, value: T) {
        let idx = self.times.partition_point(|&t| t < time);
        if self.times.get(idx).is_some_and(|&t| t == time) {
            self.values[idx] = value;
        } else {
            self.times.insert(idx, time);
            self.values.insert(idx, value);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Time of the first keyframe, if any.
    #[must_use]
    pub fn start_time(&self) -> Option<f32> {
        self.times.first().copied()
    }

    /// Time of the last keyframe, if any.
    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        self.times.last().copied()
    }

    /// Stateless evaluation at `time`.
    ///
    /// Returns `None` for an empty curve (the caller substitutes the
    /// channel identity), the constant value for a single keyframe, and an
    /// interpolation between the bracketing pair otherwise.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }
        // partition_point finds the first index with t > time; the segment
        // starts one before it.
        let index = self.times.partition_point(|&t| t <= time).saturating_sub(1);
        Some(self.sample_segment(index, time))
    }

    /// Evaluation with a cursor: identical results to [`Self::sample`] for
    /// every time, amortized O(1) when time moves monotonically.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }

        // Fast path: the cached segment, or the one right after it, still
        // brackets `time`. Falls back to binary search on larger jumps
        // (scrubbing, loop reset).
        let hint = cursor.last_index.min(self.times.len() - 1);
        let index = if self.brackets(hint, time) {
            hint
        } else if self.brackets(hint + 1, time) {
            hint + 1
        } else {
            self.times.partition_point(|&t| t <= time).saturating_sub(1)
        };

        cursor.last_index = index;
        Some(self.sample_segment(index, time))
    }

    /// True iff segment `index` covers `time`. The last keyframe's segment
    /// is open-ended (clamp region).
    fn brackets(&self, index: usize, time: f32) -> bool {
        let Some(&start) = self.times.get(index) else {
            return false;
        };
        match self.times.get(index + 1) {
            Some(&next) => time >= start && time < next,
            None => time >= start,
        }
    }

    fn sample_segment(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index + 1 >= len {
            return self.values[len - 1];
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;
        // Zero-length segments cannot occur with strictly increasing times,
        // but float subtraction still gets a guard.
        let t = if dt > 1e-6 {
            ((time - t0) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        };

        T::interpolate_linear(self.values[index], self.values[index + 1], t)
    }
}
