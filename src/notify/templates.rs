use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Notification templates, keyed `<kind>.subject` / `<kind>.body`.
/// Bodies are plain text; the notification API wraps its own layout.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            "submission_received.subject",
            "Application Submitted - GCX Supplier Portal (Tracking: {{ tracking_code }})",
        ),
        (
            "submission_received.body",
            "Dear {{ business_name }},\n\n\
             Thank you for applying to become a GCX supplier. Your application has been \
             received and is pending review.\n\n\
             Tracking code: {{ tracking_code }}\n\
             Submitted: {{ application_date }}\n\n\
             {% if missing_documents %}The following documents are still outstanding:\n\
             {% for doc in missing_documents %}- {{ doc }}\n{% endfor %}\n\
             Please upload them using the secure link below before {{ deadline }}:\n\
             {{ completion_link }}\n\n\
             {% endif %}\
             You can check the status of your application at any time using your tracking code.\n\n\
             Best regards,\n\
             GCX Supplier Application Team",
        ),
        (
            "documents_requested.subject",
            "Additional Documents Required - {{ business_name }}",
        ),
        (
            "documents_requested.body",
            "Dear {{ business_name }},\n\n\
             We have reviewed your supplier application ({{ tracking_code }}) and need \
             additional documents to complete the process.\n\n\
             Missing documents:\n\
             {% for doc in missing_documents %}- {{ doc }}\n{% endfor %}\n\
             Message from our team:\n{{ message }}\n\n\
             Please upload the missing documents using this secure link:\n\
             {{ completion_link }}\n\n\
             The link expires on {{ deadline }}.\n\n\
             Best regards,\n\
             GCX Supplier Application Team",
        ),
        (
            "application_approved.subject",
            "Application Approved - GCX Supplier Portal (Tracking: {{ tracking_code }})",
        ),
        (
            "application_approved.body",
            "Dear {{ business_name }},\n\n\
             Congratulations! Your supplier application {{ tracking_code }} has been approved.\n\n\
             {% if temp_password %}A supplier account has been created for you:\n\
             Username: {{ user_email }}\n\
             Temporary password: {{ temp_password }}\n\n\
             Log in at {{ login_link }} and change your password immediately after your \
             first login.\n\n\
             {% else %}You can continue using your existing account at {{ login_link }}.\n\n\
             {% endif %}\
             Welcome to the GCX supplier family!\n\n\
             Best regards,\n\
             GCX Supplier Application Team",
        ),
        (
            "application_rejected.subject",
            "Application Update - {{ business_name }}",
        ),
        (
            "application_rejected.body",
            "Dear {{ business_name }},\n\n\
             Thank you for your interest in becoming a GCX supplier. After careful review, \
             we regret to inform you that your application {{ tracking_code }} has not been \
             approved at this time.\n\n\
             Reason:\n{{ reason }}\n\n\
             We encourage you to address the issues above and reapply in the future.\n\n\
             Best regards,\n\
             GCX Supplier Application Team",
        ),
    ])
    .expect("notification templates are valid");
    tera
});

pub fn render(template: &str, context: &Context) -> Result<(String, String), tera::Error> {
    let subject = TEMPLATES.render(&format!("{template}.subject"), context)?;
    let body = TEMPLATES.render(&format!("{template}.body"), context)?;
    Ok((subject, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_requested_lists_missing_documents() {
        let mut ctx = Context::new();
        ctx.insert("business_name", "Kumasi Grains Ltd");
        ctx.insert("tracking_code", "GCX-2025-123456");
        ctx.insert("missing_documents", &vec!["VAT Certificate", "Tax Clearance Certificate"]);
        ctx.insert("message", "Please provide the listed documents.");
        ctx.insert("completion_link", "http://localhost:8000/api/documents/abc");
        ctx.insert("deadline", "March 01, 2026");

        let (subject, body) = render("documents_requested", &ctx).expect("template renders");
        assert!(subject.contains("Kumasi Grains Ltd"));
        assert!(body.contains("- VAT Certificate"));
        assert!(body.contains("- Tax Clearance Certificate"));
        assert!(body.contains("http://localhost:8000/api/documents/abc"));
    }

    #[test]
    fn approval_body_includes_credentials_only_when_created() {
        let mut ctx = Context::new();
        ctx.insert("business_name", "Kumasi Grains Ltd");
        ctx.insert("tracking_code", "GCX-2025-123456");
        ctx.insert("login_link", "http://localhost:8000/auth/login");
        ctx.insert("user_email", "owner@kumasigrains.gh");
        ctx.insert("temp_password", "S3cretPass!@#");

        let (_, with_credentials) = render("application_approved", &ctx).expect("renders");
        assert!(with_credentials.contains("Temporary password: S3cretPass!@#"));

        ctx.remove("temp_password");
        let (_, without) = render("application_approved", &ctx).expect("renders");
        assert!(!without.contains("Temporary password"));
        assert!(without.contains("existing account"));
    }

    #[test]
    fn rejection_body_carries_the_reason() {
        let mut ctx = Context::new();
        ctx.insert("business_name", "Kumasi Grains Ltd");
        ctx.insert("tracking_code", "GCX-2025-123456");
        ctx.insert("reason", "Tax clearance certificate has expired.");

        let (_, body) = render("application_rejected", &ctx).expect("renders");
        assert!(body.contains("Tax clearance certificate has expired."));
    }
}
