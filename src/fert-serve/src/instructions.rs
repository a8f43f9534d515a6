use crate::crop::CropType;

/// How to photograph a sample so the classifier sees what it was trained on.
pub fn capture_instructions(crop: CropType) -> &'static str {
    match crop {
        CropType::Rice => {
            "Please take a picture from directly above the paddy field to capture a \
             representative view of the rice plants. Ensure good lighting and focus on \
             the leaves."
        }
        CropType::Melon => {
            "Take a picture of a single melon leaf placed on a white, flat surface. \
             Ensure the leaf occupies at least 80% of the image and is well-lit and in \
             focus."
        }
        CropType::Cucumber => {
            "Take a picture of a single cucumber leaf placed on a dark surface. Ensure \
             the leaf is well-lit, in focus, and clearly visible against the dark \
             background."
        }
        CropType::Tomato => {
            "Take a picture of a single tomato leaf placed on a dark surface. Make sure \
             the leaf is well-lit, in focus, and stands out against the dark background."
        }
        CropType::Other => {
            "For other crops, please refer to general nitrogen recommendation charts \
             based on your crop type and local soil conditions."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_crop_has_instructions() {
        for crop in CropType::ALL.iter() {
            let text = capture_instructions(*crop);
            assert!(!text.is_empty());
            assert!(!text.contains("  "), "stray spacing in {} instructions", crop);
        }
        assert!(capture_instructions(CropType::Melon).contains("white, flat surface"));
        assert!(capture_instructions(CropType::Tomato).contains("dark surface"));
    }
}
