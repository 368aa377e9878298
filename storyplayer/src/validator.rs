use std::collections::HashSet;

use crate::errors::{PlayerError, Result};
use crate::model::ItemDescriptor;

/// Fail-fast validation of the construction input. The whole list is
/// rejected on the first offending descriptor, with its index in the
/// error message.
pub(crate) fn validate_descriptors(descriptors: &[ItemDescriptor]) -> Result<()> {
    if descriptors.is_empty() {
        return Err(PlayerError::EmptyPlaylist);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        if descriptor.id().is_empty() {
            return Err(PlayerError::validation(index, "id must be a non-empty string"));
        }
        if !seen.insert(descriptor.id()) {
            return Err(PlayerError::validation(
                index,
                format!("duplicate id \"{}\"", descriptor.id()),
            ));
        }

        match descriptor {
            ItemDescriptor::Image {
                image_url,
                duration,
                ..
            } => {
                if image_url.is_empty() {
                    return Err(PlayerError::validation(index, "imageUrl must be a non-empty string"));
                }
                match duration {
                    Some(duration) if duration.is_finite() && *duration > 0.0 => {}
                    _ => {
                        return Err(PlayerError::validation(index, "duration must be a positive number"));
                    }
                }
            }
            ItemDescriptor::Video { video_url, .. } => {
                if video_url.is_empty() {
                    return Err(PlayerError::validation(index, "videoUrl must be a non-empty string"));
                }
            }
        }
    }

    Ok(())
}
