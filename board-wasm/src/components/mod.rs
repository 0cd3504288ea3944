pub mod comment;
pub mod post_page;
pub mod review_form;

pub use comment::CommentItem;
pub use post_page::PostPage;
pub use review_form::ReviewForm;
