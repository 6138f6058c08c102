fn main() {
    if let Err(e) = daycare_manager_lib::run() {
        log::error!("실행 중 에러가 발생했습니다: {}", e.details());
        eprintln!("{e}");
        std::process::exit(1);
    }
}
