//! Output of the mask conversion step.

/// One mask for a rank-2 array, or one mask per axis-0 slice of a rank-3 array.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSet<M> {
    Single(M),
    Stack(Vec<M>),
}

impl<M> MaskSet<M> {
    pub fn len(&self) -> usize {
        match self {
            MaskSet::Single(_) => 1,
            MaskSet::Stack(masks) => masks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens to a list; a single mask becomes a one-element list.
    pub fn into_vec(self) -> Vec<M> {
        match self {
            MaskSet::Single(mask) => vec![mask],
            MaskSet::Stack(masks) => masks,
        }
    }
}
