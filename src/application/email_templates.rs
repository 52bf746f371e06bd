use rand::Rng;
use url::Url;

const BRAND_NAME: &str = "PaperAI";
const IMAGE_BASE_URL: &str = "https://file.paperai.life/secret%2F";
const IMAGE_COUNT: u32 = 5;

/// Which checkout flow a payment email confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEmailKind {
    /// Subscription checkout completed.
    Welcome,
    /// One-time purchase completed.
    PurchaseConfirmation,
}

impl PaymentEmailKind {
    pub fn subject(&self) -> &'static str {
        match self {
            PaymentEmailKind::Welcome => "Welcome!",
            PaymentEmailKind::PurchaseConfirmation => "Thank you for your purchase!",
        }
    }
}

fn origin_label(app_origin: &str) -> String {
    Url::parse(app_origin)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| app_origin.to_string())
}

fn origin_link(app_origin: &str, path: &str) -> String {
    Url::parse(app_origin)
        .and_then(|url| url.join(path))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}{}", app_origin.trim_end_matches('/'), path))
}

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{url}" style="display:inline-block;padding:8px 16px;background-color:#000000;color:#ffffff;text-decoration:none;border-radius:6px;font-weight:500;">{label}</a>"#
    )
}

/// Link to one of the thank-you pictures, picked at random per email.
pub fn random_image_url() -> String {
    let n = rand::thread_rng().gen_range(1..=IMAGE_COUNT);
    format!("{IMAGE_BASE_URL}{n}.jpg")
}

/// Renders the payment success email. Returns `(subject, html)`.
pub fn payment_success_email(app_origin: &str, kind: PaymentEmailKind) -> (String, String) {
    let subject = kind.subject().to_string();
    let html = wrap_payment_email(app_origin, &random_image_url());
    (subject, html)
}

fn wrap_payment_email(app_origin: &str, image_url: &str) -> String {
    let origin = origin_label(app_origin);
    let hero = origin_link(app_origin, "/hero-shape.png");
    let dashboard = primary_button(&origin_link(app_origin, "/dashboard"), "Dashboard");
    let account = origin_link(app_origin, "/account");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <body style="background:#64748b;margin:0 auto;padding:40px 8px;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:464px;margin:40px auto 0;background:#ffffff;border-radius:6px;overflow:hidden;">
      <div style="height:255px;background:#000000 url('{hero}') center;">
        <h1 style="margin:0;padding-top:70px;text-align:center;font-size:48px;font-weight:700;color:#ffffff;">Welcome!</h1>
      </div>
      <div style="padding:32px;">
        <h2 style="margin:0;font-size:24px;font-weight:700;">Thanks for buying.</h2>
        <p style="margin:24px 0;font-size:16px;">Here is your pictures.</p>
        <p style="margin:0 0 24px;"><a href="{image_url}" style="font-size:12px;color:#000000;text-decoration:underline;">enjoy(click me)</a></p>
        {dashboard}
      </div>
    </div>
    <div style="max-width:464px;margin:16px auto 0;text-align:center;">
      <p style="margin:0;font-size:12px;color:#ffffff;">Not interested in receiving this email?</p>
      <a href="{account}" style="font-size:12px;color:#ffffff;text-decoration:underline;">Turn off this notification in your account settings.</a>
      <p style="margin:8px 0 0;font-size:11px;color:#e2e8f0;">{brand} - {origin}</p>
    </div>
  </body>
</html>
"#,
        hero = hero,
        image_url = image_url,
        dashboard = dashboard,
        account = account,
        brand = BRAND_NAME,
        origin = origin,
    )
}
