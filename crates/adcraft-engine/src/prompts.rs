//! Prompt construction for the two generation requests.

use crate::model::{
    AdFormData, HEADLINE_MAX_CHARS, INTERESTS_RANGE, LOCATIONS_RANGE, PRIMARY_TEXT_MAX_CHARS,
};

/// Prompt for the structured copy and targeting request.
#[must_use]
pub fn content_prompt(form: &AdFormData) -> String {
    format!(
        "Based on the following product information, generate compelling Facebook ad copy and \
detailed targeting suggestions.

Product Name: {name}
Product Description: {description}
Target Audience: {audience}

Generate a response in JSON format with the following structure:
- \"creative\": an object with \"headline\" (max {headline_max} chars) and \"primaryText\" (max {primary_max} chars).
- \"targeting\": an object with \"interests\" (an array of {interests_min}-{interests_max} specific interests), \
\"locations\" (an array of {locations_min}-{locations_max} relevant cities or countries), and \"ageRange\" (e.g., \"25-45\").

The ad copy should be engaging, persuasive, and tailored to the target audience. \
The targeting suggestions should be highly relevant to the product.",
        name = form.product_name.trim(),
        description = form.product_description.trim(),
        audience = form.target_audience.trim(),
        headline_max = HEADLINE_MAX_CHARS,
        primary_max = PRIMARY_TEXT_MAX_CHARS,
        interests_min = INTERESTS_RANGE.start(),
        interests_max = INTERESTS_RANGE.end(),
        locations_min = LOCATIONS_RANGE.start(),
        locations_max = LOCATIONS_RANGE.end(),
    )
}

/// Prompt for the single square product image.
#[must_use]
pub fn image_prompt(form: &AdFormData) -> String {
    format!(
        "Create a photorealistic, high-quality, visually appealing image for a Facebook ad. \
The image should be vibrant, clean, and professional. Do not include any text, logos, or watermarks. \
The product is \"{name}\". Description: \"{description}\". \
The style should be suitable for the target audience: {audience}.",
        name = form.product_name.trim(),
        description = form.product_description.trim(),
        audience = form.target_audience.trim(),
    )
}
