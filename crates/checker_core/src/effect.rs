use crate::{Generation, SelectedImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    DecodePreview {
        generation: Generation,
        image: SelectedImage,
    },
    SubmitImage { image: SelectedImage },
    CheckHealth,
}
