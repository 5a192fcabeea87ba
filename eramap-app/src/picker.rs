use eramap::FilePicker;
use std::path::PathBuf;

/// Native "open file" dialog restricted to web image formats
pub struct DialogPicker {
    start_dir: PathBuf,
}

impl DialogPicker {
    pub fn new(start_dir: PathBuf) -> Self {
        Self { start_dir }
    }
}

impl FilePicker for DialogPicker {
    fn pick_image(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select image")
            .set_directory(&self.start_dir)
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif"])
            .add_filter("All files", &["*"])
            .pick_file()
    }
}
