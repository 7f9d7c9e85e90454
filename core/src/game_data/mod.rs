mod classes;
mod skill_classes;

pub use classes::class_name;
pub use skill_classes::class_for_skill;
