//! Template contexts shared by the static generator and the live server

use tera::Context;

use crate::content::{estimate_read_time, richtext, Adjacent, Post};
use crate::helpers::Helpers;
use crate::prismic::PagedResult;
use crate::templates::{
    CommentsData, NavPost, PostCard, PostPageData, PostsPageData, SectionData, SiteData,
};

/// Build site data for templates
pub fn site_data(helpers: &Helpers) -> SiteData {
    let config = helpers.config();
    SiteData {
        title: config.title.clone(),
        description: config.description.clone(),
        lang: config.language.replace('_', "-"),
        url: config.url.clone(),
        root: helpers.url_for(""),
    }
}

/// Listing entry for a post
pub fn post_card(helpers: &Helpers, post: &Post) -> PostCard {
    PostCard {
        uid: post.uid.clone(),
        url: helpers.post_url(&post.uid),
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        author: post.author.clone(),
        date: helpers.date(post.first_publication_date),
        datetime: helpers.date_xml(post.first_publication_date),
    }
}

/// JSON page served to the "load more" button
///
/// `next_link` is where the button fetches the following page from; it is
/// not the repository cursor itself.
pub fn posts_page(
    helpers: &Helpers,
    page: &PagedResult<Post>,
    next_link: Option<String>,
) -> PostsPageData {
    PostsPageData {
        next_page: next_link,
        results: page.results.iter().map(|p| post_card(helpers, p)).collect(),
    }
}

/// Context for `index.html`
pub fn home_context(
    helpers: &Helpers,
    page: &PagedResult<Post>,
    next_link: Option<String>,
    preview: bool,
) -> Context {
    let posts: Vec<PostCard> = page.results.iter().map(|p| post_card(helpers, p)).collect();

    let mut context = Context::new();
    context.insert("site", &site_data(helpers));
    context.insert("posts", &posts);
    context.insert("next_page", &next_link);
    context.insert("preview", &preview);
    context
}

/// Context for `post.html`
pub fn post_context(helpers: &Helpers, post: &Post, adjacent: &Adjacent, preview: bool) -> Context {
    let sections = post
        .content
        .iter()
        .map(|block| SectionData {
            heading: block.heading.clone(),
            anchor: slug::slugify(&block.heading),
            html: richtext::as_html(&block.body),
        })
        .collect();

    let page = PostPageData {
        uid: post.uid.clone(),
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        author: post.author.clone(),
        banner_url: post.banner.url.clone(),
        date: helpers.date(post.first_publication_date),
        datetime: helpers.date_xml(post.first_publication_date),
        updated_at: helpers.updated_at(post),
        read_time: estimate_read_time(post),
        sections,
    };

    let nav = |p: &Option<Post>| {
        p.as_ref().map(|p| NavPost {
            title: p.title.clone(),
            url: helpers.post_url(&p.uid),
        })
    };

    let comments = &helpers.config().comments;
    let comments = comments.enabled().then(|| CommentsData {
        repo: comments.repo.clone(),
        issue_term: comments.issue_term.clone(),
        theme: comments.theme.clone(),
    });

    let mut context = Context::new();
    context.insert("site", &site_data(helpers));
    context.insert("post", &page);
    context.insert("previous", &nav(&adjacent.previous));
    context.insert("next", &nav(&adjacent.next));
    context.insert("comments", &comments);
    context.insert("preview", &preview);
    context
}

/// Context for `404.html`
pub fn not_found_context(helpers: &Helpers) -> Context {
    let mut context = Context::new();
    context.insert("site", &site_data(helpers));
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::project;
    use crate::prismic::mock::post_document;
    use crate::templates::TemplateRenderer;

    fn helpers() -> Helpers {
        let mut config = SiteConfig::default();
        config.comments.repo = "someone/blog-comments".to_string();
        Helpers::new(config)
    }

    fn post(uid: &str, title: &str) -> Post {
        project(&post_document(uid, uid, title, "um dois três")).unwrap()
    }

    #[test]
    fn test_post_card() {
        let card = post_card(&helpers(), &post("hello", "Hello"));
        assert_eq!(card.url, "/post/hello/");
        assert_eq!(card.date.as_deref(), Some("25 mar 2021"));
        assert_eq!(card.author, "Joseph Oliveira");
    }

    #[test]
    fn test_render_post_page() {
        let helpers = helpers();
        let renderer = TemplateRenderer::new().unwrap();
        let adjacent = Adjacent {
            previous: Some(post("older", "Older post")),
            next: None,
        };

        let context = post_context(&helpers, &post("hello", "Hello"), &adjacent, true);
        let html = renderer.render("post.html", &context).unwrap();

        assert!(html.contains("<title>Hello | spacetraveling</title>"));
        assert!(html.contains("1 min"));
        assert!(html.contains("<p>um dois três</p>"));
        assert!(html.contains(r#"<section id="intro">"#));
        assert!(html.contains("Older post"));
        assert!(html.contains("post anterior"));
        assert!(!html.contains("próximo post"));
        assert!(html.contains("atualizado em 26 mar 2021"));
        assert!(html.contains("utteranc.es/client.js"));
        assert!(html.contains("someone&#x2F;blog-comments"));
        assert!(html.contains("Sair do modo Preview"));
    }

    #[test]
    fn test_render_home_with_next_page() {
        let helpers = helpers();
        let renderer = TemplateRenderer::new().unwrap();
        let page = PagedResult {
            next_page: Some("cursor".to_string()),
            results: vec![post("a", "First"), post("b", "Second")],
        };

        let context = home_context(&helpers, &page, Some("/posts/page/2.json".to_string()), false);
        let html = renderer.render("index.html", &context).unwrap();

        assert!(html.contains("First"));
        assert!(html.contains("Second"));
        assert!(html.contains("Carregar mais posts"));
        assert!(html.contains("data-next=\"&#x2F;posts&#x2F;page&#x2F;2.json\""));
        assert!(!html.contains("Sair do modo Preview"));
    }

    #[test]
    fn test_posts_page_json() {
        let helpers = helpers();
        let page = PagedResult {
            next_page: None,
            results: vec![post("c", "Third")],
        };
        let json = serde_json::to_value(posts_page(&helpers, &page, None)).unwrap();

        assert_eq!(json["next_page"], serde_json::Value::Null);
        assert_eq!(json["results"][0]["uid"], "c");
        assert_eq!(json["results"][0]["url"], "/post/c/");
    }
}
