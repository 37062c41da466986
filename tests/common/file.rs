use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Descriptor {
    File(FileSpec),
    Directory(DirectorySpec),
}

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct DirectorySpec {
    pub path: PathBuf,
    pub files: Vec<Descriptor>,
}

pub fn write_file(file_spec: FileSpec) {
    // make sure the parent directory exists
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

/// Files named `<word>_<n>.txt` so generated names never collide
pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|index| {
            let file_name = format!("{}_{index}.txt", Word().fake::<String>());
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(dir.join(file_name), file_content);
            write_file(file_spec.clone());

            file_spec
        })
        .collect::<Vec<_>>()
}

pub fn write_generated_directory(
    dir: &Path,
    name: &str,
    files_count: usize,
    subdirs_count: usize,
    depth: usize,
) -> DirectorySpec {
    let dir_path = dir.join(name);
    std::fs::create_dir_all(&dir_path)
        .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", dir_path, e));

    let mut descriptors = write_generated_files(&dir_path, files_count)
        .into_iter()
        .map(Descriptor::File)
        .collect::<Vec<_>>();

    if depth > 0 {
        for index in 0..subdirs_count {
            let subdir_spec = write_generated_directory(
                &dir_path,
                &format!("dir_{index}"),
                files_count,
                subdirs_count,
                depth - 1,
            );
            descriptors.push(Descriptor::Directory(subdir_spec));
        }
    }

    DirectorySpec::new(dir_path, descriptors)
}

/// Every file under a descriptor, with its path relative to `root`
pub fn list_all_files(descriptor: &Descriptor, root: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();

    match descriptor {
        Descriptor::File(file_spec) => {
            let relative = file_spec
                .path
                .strip_prefix(root)
                .unwrap_or_else(|e| panic!("{:?} is not under {:?}: {}", file_spec.path, root, e));
            files.push((relative.to_string_lossy().into_owned(), file_spec.content.clone()));
        }
        Descriptor::Directory(dir_spec) => {
            for desc in &dir_spec.files {
                files.extend(list_all_files(desc, root));
            }
        }
    }

    files.sort();
    files
}
