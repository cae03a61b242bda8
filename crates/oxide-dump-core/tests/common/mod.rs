#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_dump_core::{ChunkFeeder, StatementSplitter, split};

/// Splits `input` in one piece.
pub fn split_whole(input: &str) -> Vec<String> {
    split(input)
}

/// Feeds `input` through a [`ChunkFeeder`], cutting it at the given char
/// offsets.
pub fn split_at(input: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut cuts: Vec<usize> = cuts.iter().map(|&c| c.min(chars.len())).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(chars.len())) {
        chunks.push(chars[start..cut].iter().collect::<String>());
        start = cut;
    }
    feed_chunks(&chunks)
}

/// Feeds every chunk through a fresh feeder and collects the statements.
pub fn feed_chunks<S: AsRef<str>>(chunks: &[S]) -> Vec<String> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut splitter = StatementSplitter::new();
    splitter.on_statement(move |statement| sink.lock().unwrap().push(statement));

    let mut feeder = ChunkFeeder::new(splitter);
    for chunk in chunks {
        feeder.enqueue(chunk.as_ref());
    }
    assert!(feeder.is_idle());

    let statements = seen.lock().unwrap().clone();
    statements
}

/// A dump in the shape `mysqldump` produces.
pub const MYSQLDUMP: &str = r#"-- MySQL dump 10.13
/*!40101 SET NAMES utf8mb4 */;
DROP TABLE IF EXISTS `users`;
CREATE TABLE `users` (
  `id` int NOT NULL AUTO_INCREMENT,
  `name` varchar(255) DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB;

LOCK TABLES `users` WRITE;
INSERT INTO `users` VALUES (1,'O\'Brien; Pat'),(2,'semi;colon'),(3,'back\\slash'),(4,'say \"hi\"');
UNLOCK TABLES;

DELIMITER ;;
CREATE TRIGGER `users_bi` BEFORE INSERT ON `users` FOR EACH ROW BEGIN
  SET NEW.name = TRIM(NEW.name);
END ;;
DELIMITER ;

-- Dump completed
"#;
