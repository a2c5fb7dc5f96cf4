// Colored terminal output for processed notifications.
//
// main.rs delegates here for the human-readable form; `--json` output
// bypasses this module entirely.

use colored::Colorize;

use crate::image::reference::{ImageKind, ImageReference};
use crate::notification::ProcessedNotification;

/// Display a list of processed notifications.
pub fn display_notifications(notifications: &[ProcessedNotification]) {
    if notifications.is_empty() {
        println!("No notifications in input.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Notifications ({}) ===", notifications.len()).bold()
    );

    for (i, notification) in notifications.iter().enumerate() {
        println!();
        display_notification(i + 1, notification);
    }
    println!();

    let stamped = notifications.iter().filter(|n| n.body.has_timestamp()).count();
    let with_image = notifications.iter().filter(|n| !n.image.is_empty()).count();
    println!(
        "  {} with timestamp, {} with a loadable image",
        stamped, with_image
    );
}

/// Display a single processed notification.
pub fn display_notification(index: usize, notification: &ProcessedNotification) {
    let title = notification.title.as_deref().unwrap_or("(untitled)");
    let app = notification
        .app
        .as_deref()
        .map(|a| format!(" [{a}]"))
        .unwrap_or_default();
    println!("  {:>3}. {}{}", index, title.bold(), app.dimmed());

    for line in notification.body.notification_body.lines() {
        println!("       {}", line);
    }

    match (&notification.sent_at, notification.body.has_timestamp()) {
        (Some(sent_at), _) => println!("       {} {}", "sent".dimmed(), sent_at.to_rfc3339()),
        (None, true) => println!(
            "       {} {} {}",
            "sent".dimmed(),
            notification.body.timestamp,
            "(unparsed)".yellow()
        ),
        (None, false) => {}
    }

    if let Some(line) = image_line(&notification.image) {
        println!("       {} {}", "image".dimmed(), line);
    }
    if let Some(cta) = &notification.cta {
        println!("       {} {}", "link".dimmed(), cta.underline());
    }
}

/// One-line summary of an image reference, or None when there is nothing to show.
fn image_line(image: &ImageReference) -> Option<String> {
    if image.is_empty() {
        return None;
    }
    let preview = match image.kind {
        // Data URIs are long and unreadable
        ImageKind::Base64 => super::truncate_chars(&image.url, 48),
        ImageKind::Http | ImageKind::Ipfs => image.url.clone(),
    };
    Some(format!("{} {}", colorize_kind(image.kind), preview))
}

/// Colorize an image kind tag.
fn colorize_kind(kind: ImageKind) -> colored::ColoredString {
    match kind {
        ImageKind::Http => kind.as_str().green(),
        ImageKind::Ipfs => kind.as_str().cyan(),
        ImageKind::Base64 => kind.as_str().magenta(),
    }
}
