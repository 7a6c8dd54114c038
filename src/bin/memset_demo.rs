// Runs the memset lesson quietly and greets the world.

use log::error;
use memset_lesson::{Lesson, LessonConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = LessonConfig::default();
    match Lesson::new(config.clone()).and_then(|lesson| lesson.run()) {
        Ok(report) if config.narrate => eprint!("{}", report.render(true)),
        Ok(_) => {}
        Err(err) => error!("memset lesson failed: {err}"),
    }

    println!("Hello World!");
}
