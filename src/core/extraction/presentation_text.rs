use crate::core::drive::Presentation;

/// Lists the shape text of every slide, numbered from 1. Each run that is not
/// pure whitespace is emitted on its own line; a blank line closes each slide.
pub fn flatten_presentation(presentation: &Presentation) -> String {
    let mut parts = vec![format!("Presentation: {}\n", presentation.title())];

    for (index, slide) in presentation.slides.iter().enumerate() {
        parts.push(format!("\n## Slide {}\n", index + 1));

        let runs = slide
            .page_elements
            .iter()
            .filter_map(|element| element.shape.as_ref())
            .filter_map(|shape| shape.text.as_ref())
            .flat_map(|text| text.text_elements.iter())
            .filter_map(|element| element.text_run.as_ref())
            .filter(|run| !run.content.trim().is_empty())
            .map(|run| run.content.clone());
        parts.extend(runs);

        parts.push(String::new());
    }

    parts.join("\n")
}
