// Integration test utilities and fixture data for Phenonet.

use std::path::{Path, PathBuf};

use phenonet_core::config::PhenonetConfig;

pub const HEADER: &str = "rsid,phe_id,rsid_hex,phe_hex,phe_label,phe_cat,chrom,\
beta.eur,pval.eur,beta.afr,pval.afr,beta.meta,pval.meta";

/// Phenotype 250 (Type 2 diabetes), split over two chunk files.
const DIABETES_1: &[&str] = &[
    "rs1,250,#1f77b4,#d62728,Type 2 diabetes,endocrine/metabolic,1,0.30,1e-9,0.20,1e-6,0.25,1e-10",
    "rs2,250,#ff7f0e,#d62728,Type 2 diabetes,endocrine/metabolic,2,-0.20,1e-7,-0.10,1e-3,-0.15,1e-8",
    "rs3,250,#2ca02c,#d62728,Type 2 diabetes,endocrine/metabolic,3,0.10,1e-5,NA,NA,0.10,1e-6",
];
const DIABETES_2: &[&str] = &[
    "rs1,401,#1f77b4,#9467bd,Obesity,endocrine/metabolic,1,0.25,1e-8,0.15,1e-5,0.20,1e-9",
    "rs2,401,#ff7f0e,#9467bd,Obesity,endocrine/metabolic,2,0.15,1e-6,-0.30,1e-7,0.20,1e-7",
    "rs3,274,#2ca02c,#8c564b,Gout,endocrine/metabolic,3,0.05,1e-2,0.05,1e-2,0.05,1e-2",
];

/// Phenotype 401 (Obesity), a single file.
const OBESITY: &[&str] = &[
    "rs1,401,#1f77b4,#9467bd,Obesity,endocrine/metabolic,1,0.25,1e-8,0.15,1e-5,0.20,1e-9",
    "rs2,401,#ff7f0e,#9467bd,Obesity,endocrine/metabolic,2,0.15,1e-6,-0.30,1e-7,0.20,1e-7",
    "rs4,401,#17becf,#9467bd,Obesity,endocrine/metabolic,X,0.30,1e-9,NA,NA,0.30,1e-10",
    "rs1,250,#1f77b4,#d62728,Type 2 diabetes,endocrine/metabolic,1,0.30,1e-9,0.20,1e-6,0.25,1e-10",
    "rs2,250,#ff7f0e,#d62728,Type 2 diabetes,endocrine/metabolic,2,-0.20,1e-7,-0.10,1e-3,-0.15,1e-8",
    "rs4,555,#17becf,#7f7f7f,Essential hypertension,circulatory system,X,0.20,1e-8,NA,NA,0.20,1e-9",
];

const NODE_ATTRIBUTES: &str = "\
id,x,y,size,label,hex,phenotype_category,degree
250,0.1,0.2,5,Type 2 diabetes,#d62728,endocrine/metabolic,3
401,1.0,1.5,4,Obesity,#9467bd,endocrine/metabolic,2
274,2.0,0.5,2,Gout,#8c564b,endocrine/metabolic,1
555,3.0,3.0,1,Essential hypertension,#7f7f7f,circulatory system,1
";

const EDGELIST: &str = "\
source,target,eur_1e-04_same_dir_weight,eur_1e-04_diff_dir_weight,eur_1e-08_same_dir_weight,eur_1e-08_diff_dir_weight
250,401,0.5,0.25,0.4,0
250,274,0,0.4,0,0
401,555,0.3,0,0,0
274,555,0,0,0,0
";

/// A temporary data directory laid out like `public/data`.
#[derive(Debug)]
pub struct TestDataset {
    pub dir: tempfile::TempDir,
}

impl TestDataset {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn node_files(&self) -> PathBuf {
        self.path().join("node_files")
    }

    /// Two phenotypes with shared SNPs plus a small overview graph.
    ///
    /// - `250` is chunked into `250_1.csv` and `250_2.csv`; its SNPs rs1
    ///   and rs2 are shared with `401`, rs3 links to `274` only.
    /// - `401` is a single file; rs4 links it to `555`.
    /// - No phenotype has `amr` or `eas` data.
    pub fn standard() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let dataset = Self { dir };
        std::fs::create_dir_all(dataset.node_files()).unwrap();

        dataset.write_phenotype("250_1", DIABETES_1);
        dataset.write_phenotype("250_2", DIABETES_2);
        dataset.write_phenotype("401", OBESITY);
        dataset.write("node_attributes.csv", NODE_ATTRIBUTES);
        dataset.write("edgelist_updated_scaled.csv", EDGELIST);
        dataset
    }

    /// Write `<name>.csv` under `node_files/` with the standard header.
    pub fn write_phenotype(&self, name: &str, rows: &[&str]) {
        let mut text = format!("{HEADER}\r\n");
        for row in rows {
            text.push_str(row);
            text.push_str("\r\n");
        }
        std::fs::write(self.node_files().join(format!("{name}.csv")), text).unwrap();
    }

    /// Write a file relative to the data directory.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn config(&self) -> PhenonetConfig {
        PhenonetConfig::default()
    }
}
