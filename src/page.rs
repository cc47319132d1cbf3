//! A sample page: articles, each with its comments.

use anyhow::{Result, anyhow};
use shtml::{CompileOptions, Condition, Template, a, attribute, body, compile, contents,
            element, head, html_page, p, span, subsection, switch, text, text_with};
use shtml_bindings::{BindArg, GeneratedStream, Schema, Tag, Var};
use shtml_safe::SafeString;

#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub url: String,
    pub body: String,
    pub comments: Vec<Comment>,
}

/// `num_articles` made-up articles with `num_comments` comments
/// each. Some comments try to inject markup.
pub fn sample_articles(num_articles: usize, num_comments: usize) -> Vec<Article> {
    (0..num_articles).map(|i| Article {
        title: format!("Article #{i}: on <things> & stuff"),
        author: format!("Author {}", i % 7),
        url: format!("/articles/{i}?ref=list&page={}", i / 10),
        body: "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
               eiusmod tempor incididunt ut labore et dolore magna aliqua."
            .repeat(1 + i % 3),
        comments: (0..num_comments).map(|j| Comment {
            author: format!("reader{j}"),
            text: if j % 5 == 4 {
                "<script>alert('hi')</script>".into()
            } else {
                format!("Comment {j} on article {i}")
            },
        }).collect(),
    }).collect()
}

fn s(value: &str) -> SafeString {
    SafeString::untrusted(value)
}

fn comment_count_is_zero(vs: &shtml_bindings::ValueSet<'_>) -> bool {
    vs.scalar_by_name("comment_count") == Some("0")
}

/// The page as a node tree.
pub fn article_page_node() -> shtml::Node {
    let page_title = Var::free("page_title");
    html_page(
        head(contents![element("title", contents![text(&page_title)])]),
        body(contents![
            element("h1", contents![text(&page_title)]),
            subsection("articles", element("article", contents![
                element("h2", contents![
                    a(contents![attribute("href", Var::free("url")),
                                text(Var::free("title"))])]),
                p(contents![attribute("class", "byline"),
                            text("by "),
                            text(Var::free("author"))]),
                p(contents![text_with(Var::free("body"), 72)]),
                switch(
                    vec![(Condition::new(comment_count_is_zero),
                          Some(p(contents![text("No comments yet.")])))],
                    Some(p(contents![text(Var::free("comment_count")), text(" comments:")]))),
                subsection("comments", p(contents![
                    attribute("class", "comment"),
                    span(contents![text(Var::free("comment_author"))]),
                    text(": "),
                    text(Var::free("comment_text"))])),
            ])),
        ]),
        vec![])
}

/// The bind arguments for a page showing `articles`.
pub fn article_args(page_title: &str, articles: &[Article]) -> Vec<BindArg> {
    vec![
        BindArg::scalar("page_title", s(page_title)),
        BindArg::rows("articles", articles.iter().map(|article| vec![
            BindArg::scalar("title", s(&article.title)),
            BindArg::scalar("author", s(&article.author)),
            BindArg::scalar("url", s(&article.url)),
            BindArg::scalar("body", s(&article.body)),
            BindArg::scalar("comment_count", s(&article.comments.len().to_string())),
            BindArg::rows("comments", article.comments.iter().map(|c| vec![
                BindArg::scalar("comment_author", s(&c.author)),
                BindArg::scalar("comment_text", s(&c.text)),
            ]).collect()),
        ]).collect()),
    ]
}

fn var(schema: &Schema, name: &str) -> Result<Var> {
    schema.scalar(name).cloned()
        .ok_or_else(|| anyhow!("template has no variable {name:?}"))
}

fn tag(schema: &Schema, name: &str) -> Result<Tag> {
    schema.subsection(name).cloned()
        .ok_or_else(|| anyhow!("template has no subsection {name:?}"))
}

/// The compiled article page, with the handles for setting its
/// values directly.
pub struct ArticlePage {
    template: Template,
    page_title: Var,
    articles: Tag,
    title: Var,
    author: Var,
    url: Var,
    body: Var,
    comment_count: Var,
    comments: Tag,
    comment_author: Var,
    comment_text: Var,
}

impl ArticlePage {
    pub fn new(opts: &CompileOptions) -> Result<Self> {
        let template = compile(&article_page_node(), opts)?;
        let schema = template.schema();
        let articles = tag(schema, "articles")?;
        let article = schema.child(&articles);
        let comments = tag(article, "comments")?;
        let comment = article.child(&comments);
        Ok(ArticlePage {
            page_title: var(schema, "page_title")?,
            title: var(article, "title")?,
            author: var(article, "author")?,
            url: var(article, "url")?,
            body: var(article, "body")?,
            comment_count: var(article, "comment_count")?,
            comment_author: var(comment, "comment_author")?,
            comment_text: var(comment, "comment_text")?,
            articles,
            comments,
            template,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Render via bind arguments, addressed by name.
    pub fn render_bound(&self, page_title: &str, articles: &[Article],
                        out: &mut impl std::io::Write) -> Result<()> {
        self.template.generate_html(out, &article_args(page_title, articles))
    }

    /// Render via handles, producing the rows while rendering.
    pub fn render_streamed(&self, page_title: &str, articles: &[Article],
                           out: &mut impl std::io::Write) -> Result<()> {
        let schema = self.template.schema();
        let article_schema = schema.child(&self.articles);
        let comment_schema = article_schema.child(&self.comments);

        let mut vs = self.template.value_set();
        vs.set_scalar(&self.page_title, &s(page_title))?;
        let rows = GeneratedStream::new(move || articles.iter().map(move |article| {
            let mut row = article_schema.value_set();
            row.set_scalar(&self.title, &s(&article.title))?;
            row.set_scalar(&self.author, &s(&article.author))?;
            row.set_scalar(&self.url, &s(&article.url))?;
            row.set_scalar(&self.body, &s(&article.body))?;
            row.set_scalar(&self.comment_count, &s(&article.comments.len().to_string()))?;
            row.set_subsection(&self.comments, GeneratedStream::new(move || {
                article.comments.iter().map(move |c| {
                    let mut row = comment_schema.value_set();
                    row.set_scalar(&self.comment_author, &s(&c.author))?;
                    row.set_scalar(&self.comment_text, &s(&c.text))?;
                    anyhow::Ok(row)
                })
            }));
            anyhow::Ok(row)
        }));
        vs.set_subsection(&self.articles, rows);
        self.template.render(&vs, out)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl Fn(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn t_bound_and_streamed_agree() {
        let articles = sample_articles(3, 5);
        for opts in [CompileOptions::compact(), CompileOptions::tidy()] {
            let page = ArticlePage::new(&opts).unwrap();
            let bound = render(|out| page.render_bound("News", &articles, out));
            let streamed = render(|out| page.render_streamed("News", &articles, out));
            assert_eq!(bound, streamed);
            assert!(bound.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"));
            assert!(! bound.contains("<script>"));
            assert!(bound.contains("href=\"/articles/1?ref=list&amp;page=0\""), "{bound}");
            assert!(bound.contains("5 comments:"));
        }
    }

    #[test]
    fn t_no_comments() {
        let articles = sample_articles(1, 0);
        let page = ArticlePage::new(&CompileOptions::compact()).unwrap();
        let html = render(|out| page.render_bound("News", &articles, out));
        assert!(html.contains("<p>No comments yet.</p>"), "{html}");
        assert!(! html.contains("comments:"));
    }

    #[test]
    fn t_bad_url_is_rejected() {
        let mut articles = sample_articles(1, 0);
        articles[0].url = "javascript:alert(1)".into();
        let page = ArticlePage::new(&CompileOptions::compact()).unwrap();
        let mut out = Vec::new();
        assert!(page.render_bound("News", &articles, &mut out).is_err());
        assert!(page.render_streamed("News", &articles, &mut out).is_err());
    }
}
