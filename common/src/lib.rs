mod file;
mod piece_kind;
mod player;
mod rank;
mod square;

pub use file::File;
pub use piece_kind::PieceKind;
pub use player::Player;
pub use rank::Rank;
pub use square::Square;
