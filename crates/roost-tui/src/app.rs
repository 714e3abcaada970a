use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roost_shared::{
    api::CreatePostRequest,
    voting::{self, DOWNVOTE, UPVOTE},
    Comment, CommentThread, Community, Post, PostWithCommunity, UserProfile, Vote, VoteTally,
};
use tokio::sync::mpsc;
use tracing::warn;

use crate::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    VerifyingAuth,
    Feed,
    PostDetail,
    Communities,
    CommunityPosts,
    CreatePost,
    CreateCommunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VimMode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
    ImagePath,
    Community,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityField {
    Name,
    Description,
}

/// Which comment box receives keystrokes in the post view: the top-level
/// composer or the reply panel of the selected thread row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadFocus {
    Composer,
    Thread,
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// Fixed-interval refresh of the displayed post's discussion.
    Poll,
    VerifyAuth,
    AuthSuccess,
    AuthFailed(String),
}

pub struct App {
    pub api: ApiClient,
    pub view: View,
    pub vim_mode: VimMode,

    // Loading state
    pub loading: bool,
    pub loading_message: String,
    pub error_message: Option<String>,

    // Current identity; None browses anonymously
    pub user: Option<UserProfile>,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,

    // Feed
    pub posts: Vec<Post>,
    pub selected_post: usize,

    // Communities
    pub communities: Vec<Community>,
    pub selected_community: usize,
    pub current_community: Option<Community>,
    pub community_posts: Vec<PostWithCommunity>,
    pub selected_community_post: usize,

    // Create-post form
    pub new_post_title: String,
    pub new_post_content: String,
    pub new_post_image_path: String,
    pub new_post_community: Option<usize>,
    pub post_field: PostField,
    pub post_form_error: Option<String>,
    pub post_form_success: bool,

    // Create-community form
    pub new_community_name: String,
    pub new_community_description: String,
    pub community_field: CommunityField,
    pub community_form_error: Option<String>,

    // Post detail: working set, rebuilt wholesale on every refresh
    pub current_post: Option<Post>,
    detail_return: View,
    pub thread: CommentThread,
    pub thread_rows: Vec<(usize, usize)>,
    pub thread_cursor: usize,
    pub thread_focus: ThreadFocus,
    comments_loaded: bool,
    pub thread_error: Option<String>,

    // Per-node interaction state, keyed by comment id so a poll-cycle
    // rebuild restores prior visibility
    pub collapsed: HashSet<i64>,
    pub reply_open: HashSet<i64>,
    pub reply_drafts: HashMap<i64, String>,
    pub reply_errors: HashMap<i64, String>,

    // Top-level composer
    pub new_comment: String,
    pub comment_error: Option<String>,

    // Votes
    pub votes: Vec<Vote>,
    pub tally: VoteTally,
    pub vote_error: Option<String>,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            view: View::VerifyingAuth,
            vim_mode: VimMode::Normal,
            loading: false,
            loading_message: String::new(),
            error_message: None,
            user: None,
            login_email: String::new(),
            login_password: String::new(),
            login_field: LoginField::Email,
            posts: Vec::new(),
            selected_post: 0,
            communities: Vec::new(),
            selected_community: 0,
            current_community: None,
            community_posts: Vec::new(),
            selected_community_post: 0,
            new_post_title: String::new(),
            new_post_content: String::new(),
            new_post_image_path: String::new(),
            new_post_community: None,
            post_field: PostField::Title,
            post_form_error: None,
            post_form_success: false,
            new_community_name: String::new(),
            new_community_description: String::new(),
            community_field: CommunityField::Name,
            community_form_error: None,
            current_post: None,
            detail_return: View::Feed,
            thread: CommentThread::default(),
            thread_rows: Vec::new(),
            thread_cursor: 0,
            thread_focus: ThreadFocus::Thread,
            comments_loaded: false,
            thread_error: None,
            collapsed: HashSet::new(),
            reply_open: HashSet::new(),
            reply_drafts: HashMap::new(),
            reply_errors: HashMap::new(),
            new_comment: String::new(),
            comment_error: None,
            votes: Vec::new(),
            tally: VoteTally::default(),
            vote_error: None,
        }
    }

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Handle key events, returns true if app should quit
    pub async fn handle_key(&mut self, key: KeyEvent, tx: mpsc::Sender<AppEvent>) -> Result<bool> {
        if self.error_message.is_some() && key.code != KeyCode::Esc {
            self.clear_error();
        }

        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match self.view {
            View::Login => self.handle_login_key(key, tx).await,
            View::VerifyingAuth => Ok(false), // No input during verification
            View::Feed => self.handle_feed_key(key).await,
            View::PostDetail => self.handle_post_detail_key(key).await,
            View::Communities => self.handle_communities_key(key).await,
            View::CommunityPosts => self.handle_community_posts_key(key).await,
            View::CreatePost => self.handle_create_post_key(key).await,
            View::CreateCommunity => self.handle_create_community_key(key).await,
        }
    }

    // ============ Auth ============

    async fn handle_login_key(&mut self, key: KeyEvent, tx: mpsc::Sender<AppEvent>) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => return Ok(true),
            KeyCode::Esc => {
                if self.vim_mode == VimMode::Insert {
                    self.vim_mode = VimMode::Normal;
                } else {
                    self.view = View::Feed;
                }
            }
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.login_field = match self.login_field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Char('j') | KeyCode::Down if self.vim_mode == VimMode::Normal => {
                self.login_field = LoginField::Password;
            }
            KeyCode::Char('k') | KeyCode::Up if self.vim_mode == VimMode::Normal => {
                self.login_field = LoginField::Email;
            }
            KeyCode::Enter => {
                if !self.login_email.is_empty() && !self.login_password.is_empty() {
                    self.do_login(tx).await;
                }
            }
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => match self.login_field {
                LoginField::Email => self.login_email.push(c),
                LoginField::Password => self.login_password.push(c),
            },
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => match self.login_field {
                LoginField::Email => {
                    self.login_email.pop();
                }
                LoginField::Password => {
                    self.login_password.pop();
                }
            },
            _ => {}
        }

        Ok(false)
    }

    async fn do_login(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.set_loading(true, "Logging in...");

        let email = self.login_email.clone();
        let password = self.login_password.clone();

        match self.api.login(&email, &password).await {
            Ok(user) => {
                self.user = Some(user);
                let _ = tx.send(AppEvent::AuthSuccess).await;
            }
            Err(e) => {
                let _ = tx.send(AppEvent::AuthFailed(e.to_string())).await;
            }
        }

        self.set_loading(false, "");
    }

    async fn do_logout(&mut self) {
        let _ = self.api.logout().await;
        self.user = None;
    }

    pub async fn verify_auth(&mut self) {
        if self.api.is_authenticated() {
            self.set_loading(true, "Verifying authentication...");
            match self.api.me().await {
                Ok(user) => self.user = Some(user),
                Err(_) => {
                    // Token invalid; browse anonymously
                    let _ = self.api.logout().await;
                }
            }
            self.set_loading(false, "");
        }

        self.view = View::Feed;
        self.load_feed().await;
    }

    pub async fn on_auth_success(&mut self) {
        self.view = View::Feed;
        self.login_password.clear();
        self.load_feed().await;
    }

    pub fn on_auth_failed(&mut self, msg: String) {
        self.set_error(format!("Login failed: {}", msg));
        self.login_password.clear();
    }

    // ============ Feed ============

    async fn handle_feed_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_post < self.posts.len().saturating_sub(1) {
                    self.selected_post += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_post = self.selected_post.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(post) = self.posts.get(self.selected_post) {
                    let post_id = post.id;
                    self.open_post(post_id, View::Feed).await;
                }
            }
            KeyCode::Char('n') => {
                self.post_form_error = None;
                self.post_form_success = false;
                self.view = View::CreatePost;
                if self.communities.is_empty() {
                    self.load_communities().await;
                }
            }
            KeyCode::Char('c') => {
                self.view = View::Communities;
                self.load_communities().await;
            }
            KeyCode::Char('L') => {
                if self.user.is_some() {
                    self.do_logout().await;
                } else {
                    self.view = View::Login;
                }
            }
            _ => {}
        }

        Ok(false)
    }

    async fn load_feed(&mut self) {
        self.set_loading(true, "Loading posts...");

        match self.api.list_posts().await {
            Ok(posts) => {
                self.posts = posts;
                self.selected_post = self.selected_post.min(self.posts.len().saturating_sub(1));
            }
            Err(e) => self.set_error(format!("Failed to load posts: {}", e)),
        }

        self.set_loading(false, "");
    }

    // ============ Communities ============

    async fn handle_communities_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Backspace => self.view = View::Feed,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_community < self.communities.len().saturating_sub(1) {
                    self.selected_community += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_community = self.selected_community.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(community) = self.communities.get(self.selected_community) {
                    let community = community.clone();
                    self.open_community(community).await;
                }
            }
            KeyCode::Char('n') => {
                self.community_form_error = None;
                self.view = View::CreateCommunity;
            }
            _ => {}
        }

        Ok(false)
    }

    async fn load_communities(&mut self) {
        self.set_loading(true, "Loading communities...");

        match self.api.list_communities().await {
            Ok(communities) => {
                self.communities = communities;
                self.selected_community = self
                    .selected_community
                    .min(self.communities.len().saturating_sub(1));
            }
            Err(e) => self.set_error(format!("Failed to load communities: {}", e)),
        }

        self.set_loading(false, "");
    }

    async fn open_community(&mut self, community: Community) {
        self.set_loading(true, "Loading community posts...");

        match self.api.list_community_posts(community.id).await {
            Ok(posts) => {
                self.community_posts = posts;
                self.selected_community_post = 0;
                self.current_community = Some(community);
                self.view = View::CommunityPosts;
            }
            Err(e) => self.set_error(format!("Failed to load community posts: {}", e)),
        }

        self.set_loading(false, "");
    }

    async fn handle_community_posts_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Backspace => {
                self.current_community = None;
                self.view = View::Communities;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_community_post < self.community_posts.len().saturating_sub(1) {
                    self.selected_community_post += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_community_post = self.selected_community_post.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(post) = self.community_posts.get(self.selected_community_post) {
                    let post_id = post.post.id;
                    self.open_post(post_id, View::CommunityPosts).await;
                }
            }
            _ => {}
        }

        Ok(false)
    }

    async fn handle_create_community_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Esc => {
                if self.vim_mode == VimMode::Insert {
                    self.vim_mode = VimMode::Normal;
                } else {
                    self.view = View::Communities;
                }
            }
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => {
                self.view = View::Communities;
            }
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.community_field = match self.community_field {
                    CommunityField::Name => CommunityField::Description,
                    CommunityField::Description => CommunityField::Name,
                };
            }
            KeyCode::Enter => {
                if !self.new_community_name.is_empty() && !self.new_community_description.is_empty()
                {
                    self.do_create_community().await;
                }
            }
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => match self.community_field {
                CommunityField::Name => self.new_community_name.push(c),
                CommunityField::Description => self.new_community_description.push(c),
            },
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => match self.community_field {
                CommunityField::Name => {
                    self.new_community_name.pop();
                }
                CommunityField::Description => {
                    self.new_community_description.pop();
                }
            },
            _ => {}
        }

        Ok(false)
    }

    async fn do_create_community(&mut self) {
        self.set_loading(true, "Creating community...");

        let name = self.new_community_name.clone();
        let description = self.new_community_description.clone();

        match self.api.create_community(&name, &description).await {
            Ok(_) => {
                self.new_community_name.clear();
                self.new_community_description.clear();
                self.community_form_error = None;
                self.vim_mode = VimMode::Normal;
                self.view = View::Communities;
                self.load_communities().await;
            }
            Err(e) => {
                self.community_form_error = Some(format!("Error creating community: {}", e));
            }
        }

        self.set_loading(false, "");
    }

    // ============ Create post ============

    async fn handle_create_post_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Esc => {
                if self.vim_mode == VimMode::Insert {
                    self.vim_mode = VimMode::Normal;
                } else {
                    self.view = View::Feed;
                }
            }
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => {
                self.view = View::Feed;
            }
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                if self.post_field != PostField::Community {
                    self.vim_mode = VimMode::Insert;
                }
            }
            KeyCode::Tab => self.post_field = next_post_field(self.post_field),
            KeyCode::BackTab => self.post_field = previous_post_field(self.post_field),
            KeyCode::Char('j') | KeyCode::Down if self.vim_mode == VimMode::Normal => {
                self.post_field = next_post_field(self.post_field);
            }
            KeyCode::Char('k') | KeyCode::Up if self.vim_mode == VimMode::Normal => {
                self.post_field = previous_post_field(self.post_field);
            }
            KeyCode::Char('h') | KeyCode::Left
                if self.vim_mode == VimMode::Normal && self.post_field == PostField::Community =>
            {
                self.cycle_post_community(false);
            }
            KeyCode::Char('l') | KeyCode::Right
                if self.vim_mode == VimMode::Normal && self.post_field == PostField::Community =>
            {
                self.cycle_post_community(true);
            }
            KeyCode::Enter => self.do_create_post().await,
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => match self.post_field {
                PostField::Title => self.new_post_title.push(c),
                PostField::Content => self.new_post_content.push(c),
                PostField::ImagePath => self.new_post_image_path.push(c),
                PostField::Community => {}
            },
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => match self.post_field {
                PostField::Title => {
                    self.new_post_title.pop();
                }
                PostField::Content => {
                    self.new_post_content.pop();
                }
                PostField::ImagePath => {
                    self.new_post_image_path.pop();
                }
                PostField::Community => {}
            },
            _ => {}
        }

        Ok(false)
    }

    fn cycle_post_community(&mut self, forward: bool) {
        if self.communities.is_empty() {
            return;
        }
        let last = self.communities.len() - 1;
        self.new_post_community = match (self.new_post_community, forward) {
            (None, true) => Some(0),
            (Some(i), true) if i < last => Some(i + 1),
            (Some(_), true) => None,
            (None, false) => Some(last),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
    }

    async fn do_create_post(&mut self) {
        self.post_form_success = false;

        if self.new_post_title.is_empty() || self.new_post_content.is_empty() {
            self.post_form_error = Some("Title and content are required".to_string());
            return;
        }
        if self.new_post_image_path.is_empty() {
            self.post_form_error = Some("Please select an image".to_string());
            return;
        }
        let Some(user) = self.user.clone() else {
            self.post_form_error = Some("You must be logged in to post".to_string());
            return;
        };

        self.set_loading(true, "Uploading image...");
        let image_path = self.new_post_image_path.clone();
        let image_url = match self.api.upload_post_image(Path::new(&image_path)).await {
            Ok(url) => url,
            Err(e) => {
                self.post_form_error = Some(format!("Image upload failed: {}", e));
                self.set_loading(false, "");
                return;
            }
        };

        self.set_loading(true, "Creating post...");
        let req = CreatePostRequest {
            title: self.new_post_title.clone(),
            content: self.new_post_content.clone(),
            image_url,
            avatar_url: user.avatar_url.clone(),
            community_id: self
                .new_post_community
                .and_then(|i| self.communities.get(i))
                .map(|c| c.id),
        };

        match self.api.create_post(req).await {
            Ok(_) => {
                self.post_form_success = true;
                self.post_form_error = None;
                self.new_post_title.clear();
                self.new_post_content.clear();
                self.new_post_image_path.clear();
                self.new_post_community = None;
                self.vim_mode = VimMode::Normal;
                self.load_feed().await;
            }
            Err(e) => {
                self.post_form_error = Some(format!("Error creating post: {}", e));
            }
        }

        self.set_loading(false, "");
    }

    // ============ Post detail ============

    async fn open_post(&mut self, post_id: i64, return_view: View) {
        self.set_loading(true, "Loading post...");

        match self.api.get_post(post_id).await {
            Ok(post) => {
                self.current_post = Some(post);
                self.detail_return = return_view;
                self.reset_discussion_state();
                self.view = View::PostDetail;
                self.refresh_discussion().await;
            }
            Err(e) => self.set_error(format!("Failed to load post: {}", e)),
        }

        self.set_loading(false, "");
    }

    /// Per-node interaction state lives only as long as the post stays on
    /// screen; opening a post starts from scratch.
    fn reset_discussion_state(&mut self) {
        self.thread = CommentThread::default();
        self.thread_rows.clear();
        self.thread_cursor = 0;
        self.thread_focus = ThreadFocus::Thread;
        self.comments_loaded = false;
        self.thread_error = None;
        self.collapsed.clear();
        self.reply_open.clear();
        self.reply_drafts.clear();
        self.reply_errors.clear();
        self.new_comment.clear();
        self.comment_error = None;
        self.votes.clear();
        self.tally = VoteTally::default();
        self.vote_error = None;
    }

    /// Refetch the displayed post's comments and votes and rebuild the
    /// derived tree and tally from scratch. Poll failures keep the stale
    /// working set on screen.
    async fn refresh_discussion(&mut self) {
        let Some(post_id) = self.current_post.as_ref().map(|p| p.id) else {
            return;
        };

        match self.api.list_comments(post_id).await {
            Ok(comments) => self.on_comments_loaded(comments),
            Err(e) => {
                warn!(post_id, error = %e, "comment refresh failed");
                if !self.comments_loaded {
                    self.thread_error = Some("Error getting comments".to_string());
                }
            }
        }

        match self.api.list_votes(post_id).await {
            Ok(votes) => self.on_votes_loaded(votes),
            Err(e) => warn!(post_id, error = %e, "vote refresh failed"),
        }
    }

    pub fn on_comments_loaded(&mut self, comments: Vec<Comment>) {
        self.thread = CommentThread::build(comments);
        self.comments_loaded = true;
        self.thread_error = None;
        self.rebuild_thread_rows();
    }

    pub fn on_votes_loaded(&mut self, votes: Vec<Vote>) {
        self.tally = VoteTally::count(&votes);
        self.votes = votes;
    }

    pub fn rebuild_thread_rows(&mut self) {
        let rows = self
            .thread
            .visible_rows(|comment| self.collapsed.contains(&comment.id));
        self.thread_rows = rows;
        self.thread_cursor = self
            .thread_cursor
            .min(self.thread_rows.len().saturating_sub(1));
    }

    pub fn selected_comment_id(&self) -> Option<i64> {
        self.thread_rows
            .get(self.thread_cursor)
            .map(|&(index, _)| self.thread.node(index).comment.id)
    }

    /// Collapse or expand the selected node. Only meaningful with replies;
    /// the collapsed set survives refreshes so re-expansion restores the
    /// earlier visibility.
    pub fn toggle_collapse(&mut self) {
        let Some(&(index, _)) = self.thread_rows.get(self.thread_cursor) else {
            return;
        };
        if !self.thread.node(index).has_replies() {
            return;
        }

        let id = self.thread.node(index).comment.id;
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
        self.rebuild_thread_rows();
    }

    /// Reply/cancel on the selected node. Returns true when the panel is now
    /// open. Cancelling hides the panel but keeps the draft.
    pub fn toggle_reply_panel(&mut self) -> bool {
        let Some(id) = self.selected_comment_id() else {
            return false;
        };

        if self.reply_open.remove(&id) {
            self.reply_errors.remove(&id);
            false
        } else {
            self.reply_open.insert(id);
            true
        }
    }

    /// The draft a submission would send, or None when nothing must be sent:
    /// empty text is a no-op and the panel stays open.
    fn pending_submission(&self, parent: Option<i64>) -> Option<String> {
        let draft = match parent {
            None => self.new_comment.as_str(),
            Some(id) => self.reply_drafts.get(&id).map(String::as_str).unwrap_or(""),
        };
        if draft.is_empty() {
            None
        } else {
            Some(draft.to_string())
        }
    }

    fn set_submit_error(&mut self, parent: Option<i64>, message: String) {
        match parent {
            None => self.comment_error = Some(message),
            Some(id) => {
                self.reply_errors.insert(id, message);
            }
        }
    }

    async fn submit_comment(&mut self, parent: Option<i64>) {
        let Some(post_id) = self.current_post.as_ref().map(|p| p.id) else {
            return;
        };
        let Some(content) = self.pending_submission(parent) else {
            return;
        };
        let Some(user) = self.user.clone() else {
            self.set_submit_error(parent, "You must be logged in to comment".to_string());
            return;
        };

        match self
            .api
            .create_comment(post_id, &content, parent, &user.display_name)
            .await
        {
            Ok(_) => {
                match parent {
                    None => {
                        self.new_comment.clear();
                        self.comment_error = None;
                    }
                    Some(id) => {
                        self.reply_drafts.remove(&id);
                        self.reply_errors.remove(&id);
                        self.reply_open.remove(&id);
                    }
                }
                self.vim_mode = VimMode::Normal;
                self.refresh_discussion().await;
            }
            // Failed submissions keep the draft and the panel; the user may
            // resubmit, nothing retries on its own.
            Err(e) => self.set_submit_error(parent, format!("Error posting comment: {}", e)),
        }
    }

    async fn submit_focused(&mut self) {
        match self.thread_focus {
            ThreadFocus::Composer => self.submit_comment(None).await,
            ThreadFocus::Thread => {
                if let Some(id) = self.selected_comment_id() {
                    if self.reply_open.contains(&id) {
                        self.submit_comment(Some(id)).await;
                    }
                }
            }
        }
    }

    fn focused_draft_mut(&mut self) -> Option<&mut String> {
        match self.thread_focus {
            ThreadFocus::Composer => Some(&mut self.new_comment),
            ThreadFocus::Thread => {
                let id = self.selected_comment_id()?;
                if self.reply_open.contains(&id) {
                    Some(self.reply_drafts.entry(id).or_default())
                } else {
                    None
                }
            }
        }
    }

    async fn do_vote(&mut self, value: i32) {
        let Some(post_id) = self.current_post.as_ref().map(|p| p.id) else {
            return;
        };
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else {
            self.vote_error = Some("You need to be logged in to vote".to_string());
            return;
        };

        // Apply the toggle rule locally for immediate feedback; the store
        // answers with the authoritative vote list.
        let previous = self.votes.clone();
        voting::apply_toggle(&mut self.votes, post_id, user_id, value);
        self.tally = VoteTally::count(&self.votes);

        match self.api.toggle_vote(post_id, value).await {
            Ok(votes) => {
                self.vote_error = None;
                self.on_votes_loaded(votes);
            }
            Err(e) => {
                self.votes = previous;
                self.tally = VoteTally::count(&self.votes);
                self.vote_error = Some(format!("Vote failed: {}", e));
            }
        }
    }

    async fn handle_post_detail_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        if self.vim_mode == VimMode::Insert {
            match key.code {
                KeyCode::Esc => self.vim_mode = VimMode::Normal,
                KeyCode::Enter => self.submit_focused().await,
                KeyCode::Char(c) => {
                    if let Some(draft) = self.focused_draft_mut() {
                        draft.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(draft) = self.focused_draft_mut() {
                        draft.pop();
                    }
                }
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => {
                self.current_post = None;
                self.view = self.detail_return;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.thread_focus = ThreadFocus::Thread;
                if self.thread_cursor < self.thread_rows.len().saturating_sub(1) {
                    self.thread_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.thread_focus = ThreadFocus::Thread;
                self.thread_cursor = self.thread_cursor.saturating_sub(1);
            }
            KeyCode::Char('n') if self.user.is_some() => {
                self.thread_focus = ThreadFocus::Composer;
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Char('r') => {
                self.thread_focus = ThreadFocus::Thread;
                if self.toggle_reply_panel() {
                    self.vim_mode = VimMode::Insert;
                }
            }
            KeyCode::Char('c') => self.toggle_collapse(),
            KeyCode::Char('u') => self.do_vote(UPVOTE).await,
            KeyCode::Char('d') => self.do_vote(DOWNVOTE).await,
            KeyCode::Char('i') => {
                if self.focused_draft_mut().is_some() {
                    self.vim_mode = VimMode::Insert;
                }
            }
            _ => {}
        }

        Ok(false)
    }

    /// Fixed-interval poll tick: only the displayed post's discussion is
    /// refetched, and only while the detail view is up.
    pub async fn on_poll(&mut self) {
        if self.view != View::PostDetail || self.loading {
            return;
        }
        self.refresh_discussion().await;
    }
}

fn next_post_field(field: PostField) -> PostField {
    match field {
        PostField::Title => PostField::Content,
        PostField::Content => PostField::ImagePath,
        PostField::ImagePath => PostField::Community,
        PostField::Community => PostField::Title,
    }
}

fn previous_post_field(field: PostField) -> PostField {
    match field {
        PostField::Title => PostField::Community,
        PostField::Content => PostField::Title,
        PostField::ImagePath => PostField::Content,
        PostField::Community => PostField::ImagePath,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_app() -> App {
        App::new(ApiClient::new("http://localhost:0"))
    }

    fn comment(id: i64, parent: Option<i64>) -> Comment {
        Comment {
            id,
            post_id: 1,
            user_id: Uuid::nil(),
            author: "someone".to_string(),
            content: format!("comment {id}"),
            parent_comment_id: parent,
            created_at: Utc::now(),
        }
    }

    fn sample_thread() -> Vec<Comment> {
        vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(1)),
            comment(4, Some(2)),
        ]
    }

    #[test]
    fn collapse_survives_working_set_rebuild() {
        let mut app = test_app();
        app.on_comments_loaded(sample_thread());
        assert_eq!(app.thread_rows.len(), 4);

        app.thread_cursor = 0;
        app.toggle_collapse();
        assert_eq!(app.thread_rows.len(), 1);

        // The poll cycle replaces the whole working set; prior visibility
        // must come back as it was.
        app.on_comments_loaded(sample_thread());
        assert_eq!(app.thread_rows.len(), 1);

        app.toggle_collapse();
        assert_eq!(app.thread_rows.len(), 4);
    }

    #[test]
    fn collapse_ignores_leaf_nodes() {
        let mut app = test_app();
        app.on_comments_loaded(sample_thread());

        app.thread_cursor = 2; // comment 4, no replies
        assert_eq!(app.selected_comment_id(), Some(4));
        app.toggle_collapse();
        assert_eq!(app.thread_rows.len(), 4);
    }

    #[test]
    fn reply_panel_toggles_and_cancel_keeps_draft() {
        let mut app = test_app();
        app.on_comments_loaded(sample_thread());
        app.thread_cursor = 1;

        assert!(app.toggle_reply_panel());
        app.reply_drafts.insert(2, "half-typed".to_string());

        assert!(!app.toggle_reply_panel());
        assert!(!app.reply_open.contains(&2));
        assert_eq!(app.reply_drafts.get(&2).map(String::as_str), Some("half-typed"));
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        let mut app = test_app();
        app.on_comments_loaded(sample_thread());
        app.thread_cursor = 0;
        app.toggle_reply_panel();

        assert_eq!(app.pending_submission(Some(1)), None);
        assert!(app.reply_open.contains(&1));

        assert_eq!(app.pending_submission(None), None);

        app.reply_drafts.insert(1, "a reply".to_string());
        assert_eq!(app.pending_submission(Some(1)), Some("a reply".to_string()));
    }

    #[test]
    fn cursor_clamps_when_the_thread_shrinks() {
        let mut app = test_app();
        app.on_comments_loaded(sample_thread());
        app.thread_cursor = 3;

        app.on_comments_loaded(vec![comment(1, None)]);
        assert_eq!(app.thread_cursor, 0);
        assert_eq!(app.selected_comment_id(), Some(1));
    }

    #[test]
    fn votes_retally_on_load() {
        let mut app = test_app();
        app.on_votes_loaded(vec![
            Vote {
                id: 1,
                post_id: 1,
                user_id: Uuid::from_u128(1),
                value: UPVOTE,
            },
            Vote {
                id: 2,
                post_id: 1,
                user_id: Uuid::from_u128(2),
                value: DOWNVOTE,
            },
        ]);

        assert_eq!(app.tally.likes, 1);
        assert_eq!(app.tally.dislikes, 1);
    }
}
