use maud::{html, Markup, Render};

pub struct Avatar {
    pub src: String,
    pub alt: String,
    pub size: String,
}

impl Avatar {
    pub fn new(src: &str, alt: &str) -> Self {
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
            size: "w-12 h-12".to_string(),
        }
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = size.to_string();
        self
    }
}

impl Render for Avatar {
    fn render(&self) -> Markup {
        html! {
            img class={(self.size) " rounded-full border border-gray-200"}
                src=(self.src)
                alt=(self.alt);
        }
    }
}
