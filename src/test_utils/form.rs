use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_post = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_post, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_post:?}"
    );
}

/// Assert that `form` has an input, select or textarea named `name`.
///
/// `required` checks the presence of the required attribute.
#[track_caller]
pub(crate) fn assert_form_field(form: &ElementRef<'_>, name: &str, required: bool) {
    let selector = Selector::parse("input, select, textarea").unwrap();

    let field = form
        .select(&selector)
        .find(|field| field.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("No field found with name \"{name}\""));

    assert_eq!(
        field.value().attr("required").is_some(),
        required,
        "want field {name} to have required={required}"
    );
}
