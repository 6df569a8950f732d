pub mod tokener {
    pub mod jwt;
}

pub mod uploaders {
    pub mod local_storage;
}
