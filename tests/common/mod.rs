#![allow(dead_code)]

use nfce_import::{
    error::{ImportError, ImportResult},
    models::nfce::{NewEmitente, NewImpostoDetalhado, NewNfce, NewPagamento, NewProduto},
    DocumentSource, InvoiceStore, MemoryStore, UnitOfWork,
};

pub const EXAMPLE_KEY: &str = "35240112345678000199650010000012341234567890";
pub const EXAMPLE_CNPJ: &str = "12345678000199";

pub fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read fixture {}: {}", path, e))
}

pub fn example_document() -> Vec<u8> {
    fixture("nfce_35240112345678000199650010000012341234567890.xml")
}

/// Builds access keys that differ only in the document number digits.
pub fn access_key(n: u32) -> String {
    format!("3524011234567800019965001{:09}1234567890", n)
}

pub struct ItemSpec {
    pub code: &'static str,
    pub imposto: &'static str,
}

/// Minimal but schema-shaped `nfeProc` document.
pub struct DocBuilder {
    key: String,
    cnpj: String,
    number: String,
    items: Vec<ItemSpec>,
    payments: Vec<(&'static str, &'static str)>,
    totals: String,
    omit_emit: bool,
}

impl DocBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cnpj: EXAMPLE_CNPJ.to_string(),
            number: "1234".to_string(),
            items: vec![ItemSpec {
                code: "001",
                imposto: PIS_ALIQ,
            }],
            payments: vec![("01", "42.50")],
            totals: "<vProd>42.50</vProd><vNF>42.50</vNF>".to_string(),
            omit_emit: false,
        }
    }

    pub fn cnpj(mut self, cnpj: &str) -> Self {
        self.cnpj = cnpj.to_string();
        self
    }

    pub fn number(mut self, number: &str) -> Self {
        self.number = number.to_string();
        self
    }

    pub fn items(mut self, items: Vec<ItemSpec>) -> Self {
        self.items = items;
        self
    }

    pub fn payments(mut self, payments: Vec<(&'static str, &'static str)>) -> Self {
        self.payments = payments;
        self
    }

    /// Replaces the children of `ICMSTot`.
    pub fn totals(mut self, icms_tot: &str) -> Self {
        self.totals = icms_tot.to_string();
        self
    }

    pub fn without_emit(mut self) -> Self {
        self.omit_emit = true;
        self
    }

    pub fn build(&self) -> String {
        let emit = if self.omit_emit {
            String::new()
        } else {
            format!(
                "<emit><CNPJ>{}</CNPJ><xNome>MERCADO EXEMPLO LTDA</xNome>\
                 <enderEmit><xLgr>RUA DAS FLORES</xLgr><nro>100</nro><xBairro>CENTRO</xBairro>\
                 <xMun>SAO PAULO</xMun><UF>SP</UF><CEP>01001000</CEP></enderEmit></emit>",
                self.cnpj
            )
        };

        let dets: String = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                format!(
                    "<det nItem=\"{}\"><prod><cProd>{}</cProd><xProd>PRODUTO {}</xProd>\
                     <qCom>2.0000</qCom><vUnCom>10.00</vUnCom><vProd>20.00</vProd></prod>{}</det>",
                    idx + 1,
                    item.code,
                    item.code,
                    item.imposto
                )
            })
            .collect();

        let pags: String = self
            .payments
            .iter()
            .map(|(method, amount)| {
                format!("<detPag><tPag>{}</tPag><vPag>{}</vPag></detPag>", method, amount)
            })
            .collect();

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <nfeProc xmlns=\"http://www.portalfiscal.inf.br/nfe\" versao=\"4.00\"><NFe>\
             <infNFe versao=\"4.00\" Id=\"NFe{}\">\
             <ide><serie>1</serie><nNF>{}</nNF><dhEmi>2024-01-15T10:30:00-03:00</dhEmi></ide>\
             {}{}\
             <total><ICMSTot>{}</ICMSTot></total>\
             <pag>{}</pag></infNFe></NFe></nfeProc>",
            self.key, self.number, emit, dets, self.totals, pags
        )
    }

    pub fn source(&self, name: &str) -> ImportResult<DocumentSource> {
        Ok(DocumentSource::new(name, self.build()))
    }
}

pub const PIS_ALIQ: &str = "<imposto><PIS><PISAliq><CST>01</CST><vBC>20.00</vBC>\
     <pPIS>0.6500</pPIS><vPIS>0.13</vPIS></PISAliq></PIS></imposto>";

pub const ALL_TAXES: &str = "<imposto><vTotTrib>4.20</vTotTrib>\
     <ICMS><ICMS60><orig>0</orig><CST>60</CST></ICMS60></ICMS>\
     <PIS><PISAliq><CST>01</CST><vBC>20.00</vBC><pPIS>0.6500</pPIS><vPIS>0.13</vPIS></PISAliq></PIS>\
     <COFINS><COFINSAliq><CST>01</CST><vBC>20.00</vBC><pCOFINS>3.0000</pCOFINS>\
     <vCOFINS>0.60</vCOFINS></COFINSAliq></COFINS></imposto>";

pub const NO_TAXES: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    LineItem,
    TaxDetail,
    Payment,
}

/// Wraps a [`MemoryStore`] and fails the first insert into the chosen table.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_on: FailOn,
}

impl FailingStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on,
        }
    }

    fn check(&self, table: FailOn) -> ImportResult<()> {
        if self.fail_on == table {
            Err(ImportError::persistence(format!("injected failure on {:?}", table)))
        } else {
            Ok(())
        }
    }
}

impl InvoiceStore for FailingStore {
    fn header_exists(&mut self, access_key: &str) -> ImportResult<bool> {
        self.inner.header_exists(access_key)
    }

    fn insert_header(&mut self, header: &NewNfce) -> ImportResult<i32> {
        self.inner.insert_header(header)
    }

    fn issuer_exists(&mut self, tax_id: &str) -> ImportResult<bool> {
        self.inner.issuer_exists(tax_id)
    }

    fn insert_issuer(&mut self, issuer: &NewEmitente) -> ImportResult<()> {
        self.inner.insert_issuer(issuer)
    }

    fn insert_line_item(&mut self, item: &NewProduto) -> ImportResult<i32> {
        self.check(FailOn::LineItem)?;
        self.inner.insert_line_item(item)
    }

    fn insert_tax_detail(&mut self, tax: &NewImpostoDetalhado) -> ImportResult<()> {
        self.check(FailOn::TaxDetail)?;
        self.inner.insert_tax_detail(tax)
    }

    fn insert_payment(&mut self, payment: &NewPagamento) -> ImportResult<()> {
        self.check(FailOn::Payment)?;
        self.inner.insert_payment(payment)
    }
}

impl UnitOfWork for FailingStore {
    fn run_atomic<T, F>(&mut self, work: F) -> ImportResult<T>
    where
        F: FnOnce(&mut dyn InvoiceStore) -> ImportResult<T>,
    {
        let snapshot = self.inner.snapshot();
        let result = work(self);
        if result.is_err() {
            self.inner.restore(snapshot);
        }
        result
    }
}
