//! HTML bodies for the welcome and reminder emails. All user-supplied text is
//! escaped before it is interpolated.

use store::{Priority, ReminderTier, Task, User};

use super::Email;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#EF4444",
        Priority::Medium => "#F59E0B",
        Priority::Low => "#10B981",
    }
}

pub fn welcome(user: &User) -> Email {
    let name = escape_html(&user.name);
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #4F46E5;">Welcome to TaskFlow, {name}!</h2>
  <p>Thanks for signing up.</p>
  <div style="background-color: #F3F4F6; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3>Getting started</h3>
    <ul>
      <li>Create your first task</li>
      <li>Give it a priority and a due date</li>
      <li>We will email you 24 and 12 hours before it is due</li>
    </ul>
  </div>
  <p style="color: #6B7280; font-size: 12px;">The TaskFlow team</p>
</div>"#
    );

    Email {
        to: user.email.clone(),
        to_name: user.name.clone(),
        subject: "Welcome to TaskFlow!".into(),
        html,
    }
}

pub fn reminder_subject(task: &Task, tier: ReminderTier) -> String {
    let urgency = match tier {
        ReminderTier::DayBefore => "REMINDER",
        ReminderTier::HalfDay => "URGENT",
    };
    format!(
        "{urgency}: Task \"{}\" due in {} hours!",
        task.title,
        tier.hours()
    )
}

/// Reminder for `task`, addressed to its owner.
pub fn reminder(user: &User, task: &Task, tier: ReminderTier) -> Email {
    let (accent, headline, nudge) = match tier {
        ReminderTier::DayBefore => ("#F59E0B", "REMINDER", "Don't forget to complete your task!"),
        ReminderTier::HalfDay => ("#EF4444", "URGENT", "This is urgent! Complete your task soon."),
    };
    let description = task
        .description
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "No description provided".into());
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d at %H:%M UTC").to_string())
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background-color: {accent}; color: white; padding: 15px; border-radius: 8px 8px 0 0;">
    <h2 style="margin: 0;">{headline}: Task Due Soon!</h2>
  </div>
  <div style="background-color: #F9FAFB; padding: 20px; border: 1px solid #E5E7EB;">
    <h3 style="margin-top: 0;">Hi {name},</h3>
    <p>Your task is due in <strong style="color: {accent};">{hours} hours</strong>.</p>
    <div style="background-color: white; padding: 20px; border-radius: 8px; border-left: 4px solid {priority_color};">
      <h4 style="margin: 0 0 10px 0;">{title}</h4>
      <p><strong>Description:</strong> {description}</p>
      <p><span style="background-color: {priority_color}; color: white; padding: 4px 12px; border-radius: 20px; font-size: 12px;">{priority} Priority</span>
        <span style="color: #6B7280; font-size: 14px;">Due: {due}</span></p>
    </div>
    <p style="color: {accent}; font-weight: bold; text-align: center;">{nudge}</p>
    <p style="color: #6B7280; font-size: 12px;">Mark the task as completed to stop further reminders.</p>
  </div>
</div>"#,
        name = escape_html(&user.name),
        hours = tier.hours(),
        priority_color = priority_color(task.priority),
        title = escape_html(&task.title),
        priority = task.priority,
    );

    Email {
        to: user.email.clone(),
        to_name: user.name.clone(),
        subject: reminder_subject(task, tier),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada <admin>".into(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn task(description: Option<&str>) -> Task {
        let now = Utc.with_ymd_and_hms(2030, 5, 1, 9, 0, 0).unwrap();
        Task::new(
            Uuid::new_v4(),
            "File taxes".into(),
            description.map(Into::into),
            Some(now + Duration::hours(24)),
            Priority::High,
            now,
        )
    }

    #[test]
    fn subjects_per_tier() {
        let task = task(None);
        assert_eq!(
            reminder_subject(&task, ReminderTier::DayBefore),
            "REMINDER: Task \"File taxes\" due in 24 hours!"
        );
        assert_eq!(
            reminder_subject(&task, ReminderTier::HalfDay),
            "URGENT: Task \"File taxes\" due in 12 hours!"
        );
    }

    #[test]
    fn reminder_body_escapes_and_fills_defaults() {
        let email = reminder(&user(), &task(None), ReminderTier::DayBefore);
        assert_eq!(email.to, "ada@example.com");
        assert!(email.html.contains("No description provided"));
        assert!(email.html.contains("High Priority"));
        assert!(email.html.contains("2030-05-02 at 09:00 UTC"));
        assert!(email.html.contains("Ada &lt;admin&gt;"));
        assert!(!email.html.contains("<admin>"));

        let email = reminder(&user(), &task(Some("<b>bring receipts</b>")), ReminderTier::HalfDay);
        assert!(email.html.contains("&lt;b&gt;bring receipts&lt;/b&gt;"));
    }
}
