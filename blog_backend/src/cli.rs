use crate::blog::BlogService;
use crate::schema::{BlogInfo, BlogInfoPatch, NewComment, NewPost, Post};
use crate::utils::parse_id;
use anyhow::{anyhow, Result};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run the interactive CLI the author uses to manage posts and comments
/// directly against the local database.
pub async fn run_cli(blog: BlogService) -> Result<()> {
    let mut session = CliSession { blog };

    println!("Blog CLI ready. Type 'help' for a list of commands.");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        print!("blog> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            println!("Exiting");
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let tokens = match shell_words::split(trimmed) {
            Ok(tokens) if !tokens.is_empty() => tokens,
            Ok(_) => continue,
            Err(err) => {
                println!("Unable to parse command: {err}");
                continue;
            }
        };

        match session.handle_command(&tokens) {
            Ok(LoopAction::Continue) => {}
            Ok(LoopAction::Exit) => break,
            Err(err) => {
                println!("Error: {err:#}");
            }
        }
    }

    Ok(())
}

struct CliSession {
    blog: BlogService,
}

#[derive(Debug, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Exit,
}

impl CliSession {
    fn handle_command(&mut self, tokens: &[String]) -> Result<LoopAction> {
        let command = tokens[0].as_str();
        match command {
            "help" => {
                print_help();
                Ok(LoopAction::Continue)
            }
            "posts" | "list-posts" => {
                self.list_posts()?;
                Ok(LoopAction::Continue)
            }
            "post" | "view-post" => {
                let Some(id) = tokens.get(1).and_then(|raw| parse_id(raw)) else {
                    println!("Usage: post <id>");
                    return Ok(LoopAction::Continue);
                };
                self.view_post(id)?;
                Ok(LoopAction::Continue)
            }
            "new-post" => {
                if tokens.len() < 3 {
                    println!("Usage: new-post \"title\" \"content\" [image_url]");
                    return Ok(LoopAction::Continue);
                }
                let post = self.create_post(
                    tokens[1].clone(),
                    tokens[2].clone(),
                    tokens.get(3).cloned(),
                )?;
                println!("Created post {} ({})", post.id, post.title);
                Ok(LoopAction::Continue)
            }
            "like" => {
                let Some(id) = tokens.get(1).and_then(|raw| parse_id(raw)) else {
                    println!("Usage: like <id>");
                    return Ok(LoopAction::Continue);
                };
                match self.blog.like_post(id)? {
                    Some(post) => println!("Post {} now has {} likes", post.id, post.likes),
                    None => println!("Post {id} not found"),
                }
                Ok(LoopAction::Continue)
            }
            "comments" => {
                let Some(id) = tokens.get(1).and_then(|raw| parse_id(raw)) else {
                    println!("Usage: comments <post_id>");
                    return Ok(LoopAction::Continue);
                };
                self.list_comments(id)?;
                Ok(LoopAction::Continue)
            }
            "comment" => {
                if tokens.len() < 4 {
                    println!("Usage: comment <post_id> \"name\" \"message\"");
                    return Ok(LoopAction::Continue);
                }
                let post_id = parse_id(&tokens[1]).ok_or_else(|| anyhow!("invalid post id"))?;
                let comment = self.blog.create_comment(
                    post_id,
                    NewComment {
                        author_name: tokens[2].clone(),
                        content: tokens[3..].join(" "),
                    },
                )?;
                println!("Added comment {} to post {}", comment.id, comment.post_id);
                Ok(LoopAction::Continue)
            }
            "delete-comment" => {
                let Some(id) = tokens.get(1).and_then(|raw| parse_id(raw)) else {
                    println!("Usage: delete-comment <id>");
                    return Ok(LoopAction::Continue);
                };
                self.blog.delete_comment(id)?;
                println!("Comment {id} removed");
                Ok(LoopAction::Continue)
            }
            "info" => {
                let info = self.blog.get_blog_info()?;
                print_info(&info);
                Ok(LoopAction::Continue)
            }
            "set-info" => {
                if tokens.len() < 3 {
                    println!("Usage: set-info <intro|things|expect|letterboxd> \"value\"");
                    return Ok(LoopAction::Continue);
                }
                let patch = info_patch(&tokens[1], tokens[2..].join(" "))?;
                let info = self.blog.update_blog_info(patch)?;
                print_info(&info);
                Ok(LoopAction::Continue)
            }
            "quit" | "exit" => Ok(LoopAction::Exit),
            "clear" => {
                print!("\x1B[2J\x1B[1;1H");
                Ok(LoopAction::Continue)
            }
            other => {
                println!("Unknown command '{other}'. Type 'help' for a list of commands.");
                Ok(LoopAction::Continue)
            }
        }
    }

    fn list_posts(&self) -> Result<()> {
        let posts = self.blog.list_posts()?;
        if posts.is_empty() {
            println!("No posts yet.");
            return Ok(());
        }
        for post in posts {
            println!(
                "  [{}] {} ({} likes, {})",
                post.id, post.title, post.likes, post.created_at
            );
        }
        Ok(())
    }

    fn view_post(&self, id: i64) -> Result<()> {
        let Some(post) = self.blog.get_post(id)? else {
            println!("Post {id} not found");
            return Ok(());
        };
        println!("== {} ==", post.title);
        println!("{} | {} likes", post.created_at, post.likes);
        if let Some(image) = &post.image_url {
            println!("image: {image}");
        }
        println!();
        println!("{}", post.content);
        self.list_comments(id)
    }

    fn list_comments(&self, post_id: i64) -> Result<()> {
        let comments = self.blog.list_comments(post_id)?;
        if comments.is_empty() {
            println!("No comments.");
            return Ok(());
        }
        println!("Comments:");
        for comment in comments {
            println!(
                "  [{}] {} at {}: {}",
                comment.id, comment.author_name, comment.created_at, comment.content
            );
        }
        Ok(())
    }

    fn create_post(&self, title: String, content: String, image_url: Option<String>) -> Result<Post> {
        Ok(self.blog.create_post(NewPost {
            title,
            content,
            image_url,
        })?)
    }
}

fn info_patch(field: &str, value: String) -> Result<BlogInfoPatch> {
    let mut patch = BlogInfoPatch::default();
    match field {
        "intro" => patch.intro = Some(value),
        "things" | "things-i-like" | "thingsILike" => patch.things_i_like = Some(value),
        "expect" => patch.expect = Some(value),
        "letterboxd" => patch.letterboxd = Some(value),
        other => return Err(anyhow!("unknown blog info field '{other}'")),
    }
    Ok(patch)
}

fn print_info(info: &BlogInfo) {
    println!("intro:        {}", info.intro);
    println!("things I like: {}", info.things_i_like);
    println!("expect:       {}", info.expect);
    println!("letterboxd:   {}", info.letterboxd);
    println!("updated:      {}", info.updated_at);
}

fn print_help() {
    println!("Available commands:");
    println!("  help                         Show this help message");
    println!("  posts                        List posts, newest first");
    println!("  post <id>                    Show a post and its comments");
    println!("  new-post TITLE CONTENT [IMG] Publish a post");
    println!("  like <id>                    Add a like to a post");
    println!("  comments <post_id>           List comments on a post");
    println!("  comment <post_id> NAME MSG   Add a comment to a post");
    println!("  delete-comment <id>          Remove a comment");
    println!("  info                         Show the about-me fields");
    println!("  set-info FIELD VALUE         Update intro, things, expect or letterboxd");
    println!("  clear                        Clear the screen");
    println!("  exit                         Quit the CLI");
}
