#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub fn get_bootpack_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bootpack"))
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture tree into `target`.
pub fn copy_fixture(name: &str, target: &Path) {
    let source = fixture(name);
    for entry in WalkDir::new(&source) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(&source).unwrap();
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).unwrap();
        } else {
            fs::copy(entry.path(), &destination).unwrap();
        }
    }
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Writes a JAR carrying Maven `pom.properties` for the given coordinates.
pub fn write_jar(root: &Path, relative: &str, group: &str, artifact: &str, version: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    zip.start_file(
        format!("META-INF/maven/{}/{}/pom.properties", group, artifact),
        options,
    )
    .unwrap();
    write!(
        zip,
        "groupId={}\nartifactId={}\nversion={}\n",
        group, artifact, version
    )
    .unwrap();
    zip.finish().unwrap();
}

pub const SPRING_BOOT_MANIFEST: &str = "Manifest-Version: 1.0\n\
Main-Class: org.springframework.boot.loader.JarLauncher\n\
Start-Class: com.example.demo.DemoApplication\n\
Spring-Boot-Version: 2.2.2.RELEASE\n\
Spring-Boot-Classes: BOOT-INF/classes/\n\
Spring-Boot-Lib: BOOT-INF/lib/\n";

/// Lays out an exploded Spring Boot JAR under `root`.
pub fn create_spring_boot_app(root: &Path) {
    write_file(root, "META-INF/MANIFEST.MF", SPRING_BOOT_MANIFEST);
    write_file(
        root,
        "META-INF/maven/com.example/demo/pom.properties",
        "groupId=com.example\n",
    );
    write_file(
        root,
        "BOOT-INF/classes/com/example/demo/DemoApplication.class",
        "",
    );
    write_file(root, "BOOT-INF/classes/application.properties", "server.port=8080\n");
    write_file(root, "BOOT-INF/classpath.idx", "");
    write_file(
        root,
        "org/springframework/boot/loader/JarLauncher.class",
        "",
    );
    write_jar(
        root,
        "BOOT-INF/lib/spring-core-5.2.2.RELEASE.jar",
        "org.springframework",
        "spring-core",
        "5.2.2.RELEASE",
    );
    write_jar(
        root,
        "BOOT-INF/lib/jackson-core-2.10.1.jar",
        "com.fasterxml.jackson.core",
        "jackson-core",
        "2.10.1",
    );
    write_jar(
        root,
        "BOOT-INF/lib/demo-lib-1.0.0-SNAPSHOT.jar",
        "com.example",
        "demo-lib",
        "1.0.0-SNAPSHOT",
    );
    write_file(root, "BOOT-INF/lib/index.txt", "");
}
