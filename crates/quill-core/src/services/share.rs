//! Composition of "recommend this post" emails.

use crate::domain::Post;
use crate::forms::EmailPostForm;
use crate::ports::OutgoingMail;

/// Build the recommendation mail for `post`, reachable at `post_url`.
pub fn compose_share_mail(
    post: &Post,
    post_url: &str,
    form: &EmailPostForm,
    from: &str,
) -> OutgoingMail {
    let subject = format!(
        "{} ({}) recommends you reading \"{}\"",
        form.name, form.email, post.title
    );
    let body = format!(
        "Read \"{}\" at {}\n\n{}'s comments: {}",
        post.title, post_url, form.name, form.comments
    );

    OutgoingMail {
        subject,
        body,
        from: from.to_string(),
        to: vec![form.to.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_compose_share_mail() {
        let post = Post::new(Uuid::new_v4(), "Ownership", "body");
        let form = EmailPostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob@example.com".into(),
            comments: "worth it".into(),
        };

        let mail = compose_share_mail(
            &post,
            "http://blog.test/blog/2024/1/2/ownership/",
            &form,
            "admin@myblog.com",
        );

        assert_eq!(
            mail.subject,
            "Ann (ann@example.com) recommends you reading \"Ownership\""
        );
        assert_eq!(
            mail.body,
            "Read \"Ownership\" at http://blog.test/blog/2024/1/2/ownership/\n\nAnn's comments: worth it"
        );
        assert_eq!(mail.from, "admin@myblog.com");
        assert_eq!(mail.to, vec!["bob@example.com".to_string()]);
    }
}
