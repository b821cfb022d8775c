use hyper::Method;
use tera::Context;

use super::{Page, FORM_SUCCESS_TEMPLATE, FORM_TEMPLATE};
use crate::forms::ContactForm;
use crate::http::FormData;
use crate::logger;

/// Contact form page
///
/// Anything other than POST displays an unbound form. A POST binds `data`;
/// valid input moves to the success page with only the cleaned name, invalid
/// input re-renders the form with its errors.
pub fn form_example(method: &Method, data: FormData) -> Page {
    if method != Method::POST {
        return form_page(&ContactForm::unbound());
    }

    let form = ContactForm::bind(data);
    if let Some(submission) = form.cleaned_data() {
        logger::log_debug(&format!(
            "Contact form accepted (subscribe={})",
            submission.subscribe
        ));
        let mut context = Context::new();
        context.insert("name", &submission.name);
        return Page::new(FORM_SUCCESS_TEMPLATE, context);
    }

    if logger::debug_enabled() {
        let mut fields: Vec<_> = form.errors().keys().copied().collect();
        fields.sort_unstable();
        logger::log_debug(&format!("Contact form rejected: {}", fields.join(", ")));
    }
    form_page(&form)
}

fn form_page(form: &ContactForm) -> Page {
    let mut context = Context::new();
    context.insert("form", &form.view());
    Page::new(FORM_TEMPLATE, context)
}
