mod comment_detail;
mod comment_list;

pub use comment_detail::CommentDetailView;
pub use comment_list::CommentListView;
