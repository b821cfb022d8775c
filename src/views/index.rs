use serde::Serialize;
use tera::Context;

use super::{Page, INDEX_TEMPLATE};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub name: &'static str,
    pub email: &'static str,
    pub role: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u32,
    pub text: &'static str,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// Index page: a user record bound to reactive state plus a notification list
pub fn index() -> Page {
    let user = User {
        name: "John Doe",
        email: "john@example.com",
        role: "admin",
    };
    let notifications = [
        Notification {
            id: 1,
            text: "Welcome to rnxJS!",
            kind: NotificationKind::Info,
        },
        Notification {
            id: 2,
            text: "You have 3 new messages",
            kind: NotificationKind::Success,
        },
    ];

    let mut context = Context::new();
    context.insert("user", &user);
    context.insert("notifications", &notifications);
    Page::new(INDEX_TEMPLATE, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_keys() {
        let page = index();
        assert_eq!(page.template, "index.html");

        let user = page.context.get("user").unwrap().as_object().unwrap();
        let mut keys: Vec<_> = user.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["email", "name", "role"]);
        assert_eq!(user["name"], "John Doe");
        assert_eq!(user["role"], "admin");
    }

    #[test]
    fn test_notifications_keep_order_and_type() {
        let page = index();
        assert_eq!(
            page.context.get("notifications").unwrap(),
            &json!([
                {"id": 1, "text": "Welcome to rnxJS!", "type": "info"},
                {"id": 2, "text": "You have 3 new messages", "type": "success"},
            ])
        );
    }
}
