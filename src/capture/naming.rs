/// Extension of every written capture.
pub const IMAGE_EXTENSION: &str = "png";

/// File name of a map's default-camera image: `{custom}.png` or `Map_{map_index}.png`.
pub fn map_image_name(map_index: usize, custom_name: Option<&str>) -> String {
    match custom_name {
        Some(name) => format!("{name}.{IMAGE_EXTENSION}"),
        None => format!("Map_{map_index}.{IMAGE_EXTENSION}"),
    }
}

/// File name of an additional-camera image: `{custom}.png` or `Map_{map_index}_{camera_index}.png`.
pub fn camera_image_name(map_index: usize, camera_index: usize, custom_name: Option<&str>) -> String {
    match custom_name {
        Some(name) => format!("{name}.{IMAGE_EXTENSION}"),
        None => format!("Map_{map_index}_{camera_index}.{IMAGE_EXTENSION}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/naming.rs"]
mod tests;
